//! pdfrepeat - Build a multi-page PDF by repeating one image.

mod cli;

use clap::Parser;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use pdfrepeat::Coordinator;
use pdfrepeat::error::RepeatError;
use pdfrepeat::output::{OutputFormatter, display_plan, display_summary};

#[tokio::main]
async fn main() {
    // Usage errors exit with 1; --help and --version print to stdout and exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    let partial_dir = cli.partial_dir.clone();
    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        if err.is_merge_error() {
            eprintln!(
                "  Partial documents were left in {} for inspection",
                partial_dir.display()
            );
        }
        process::exit(err.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), RepeatError> {
    let config = cli.to_config()?;

    let formatter = if cli.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.is_verbose() {
        formatter.heading(&format!("{} v{}", pdfrepeat::NAME, pdfrepeat::VERSION));
        formatter.blank_line();
    }

    let summary = Coordinator::new(config).run().await?;

    if formatter.should_print() {
        display_plan(&formatter, &summary.plan);
        formatter.blank_line();
    }
    display_summary(&formatter, &summary);

    if cli.json {
        println!("{}", summary.to_json()?);
    }

    Ok(())
}
