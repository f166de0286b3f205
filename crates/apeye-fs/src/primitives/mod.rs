pub mod remove;
pub mod rw;

pub use remove::{ensure_dir, remove_dir_all_if_exists, remove_file_if_exists};
pub use rw::{AtomicWriteOptions, atomic_write, read_if_exists};
