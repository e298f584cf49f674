use std::process::ExitCode;

use aisle_cli::{AisleApp, CliArgs};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let app = match AisleApp::from_args(&args) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match app.run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
