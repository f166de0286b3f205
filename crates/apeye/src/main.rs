use clap::Parser;
use cli::app::App;
use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let app = App::parse();
    cli::log::init(app.verbose);

    let mut stdout = std::io::stdout().lock();
    match cli::run(app, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
