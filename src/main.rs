use clap::Parser;
use folder_organizer::cli::{Args, RunOptions, run_cli};
use folder_organizer::confirm::{AssumeYes, Confirmation, PromptConfirmation};
use folder_organizer::output::OutputFormatter;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            OutputFormatter::error(&format!("Cannot determine the current directory: {}", e));
            return ExitCode::FAILURE;
        }
    };
    let options = RunOptions::from_args(&args, &current_dir);

    if !args.json {
        OutputFormatter::banner(env!("CARGO_PKG_VERSION"));
    }

    let mut confirmation: Box<dyn Confirmation> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(PromptConfirmation::stdio(args.prompt_on_stderr()))
    };

    match run_cli(&options, confirmation.as_mut()) {
        Ok(Some(_)) => ExitCode::SUCCESS,
        Ok(None) => {
            if !args.json {
                OutputFormatter::info("Nothing was changed.");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            OutputFormatter::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "folder_organizer=info"
    } else {
        "folder_organizer=error"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}
