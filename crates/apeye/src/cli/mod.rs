use anyhow::Result;
use app::{App, Commands};
use std::io::Write;

pub mod app;
pub mod cache;
pub mod log;
pub mod url;

pub fn run(app: App, out: &mut impl Write) -> Result<()> {
    let root = app.cache_dir.as_deref();
    match app.cmd {
        Commands::Url(arg) => url::show(&arg, out),
        Commands::Cache(cmd) => cache::memo(cmd, root, out),
        Commands::HttpCache(cmd) => cache::http(cmd, root, out),
    }
}
