use clap::Parser;
use colored::*;
use kaidoku::cli::{Cli, Commands, Context};
use kaidoku::utils::parallel::configure_thread_pool;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins, then KAIDOKU_LOG, then the -v count
    let log_level = std::env::var("KAIDOKU_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        let exit_code = match e.downcast_ref::<kaidoku::KaidokuError>() {
            Some(kaidoku::KaidokuError::Config(_)) => 2,
            Some(kaidoku::KaidokuError::Io(_)) => 3,
            Some(kaidoku::KaidokuError::InvalidInput(_))
            | Some(kaidoku::KaidokuError::Parse(_)) => 4,
            Some(kaidoku::KaidokuError::Computation(_)) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = Context::from_cli(&cli)?;

    let requested = if cli.threads == 0 {
        ctx.config.performance.threads
    } else {
        cli.threads
    };
    let threads = configure_thread_pool(requested);
    debug!("Using {} threads", threads);

    match cli.command {
        Commands::Align(args) => kaidoku::cli::commands::align::run(args, &ctx),
        Commands::Pairwise(args) => kaidoku::cli::commands::pairwise::run(args, &ctx),
        Commands::Config(args) => kaidoku::cli::commands::config::run(args),
    }
}
