use crate::cli::output::success;
use crate::core::config::{default_config, save_config};
use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct ConfigArgs {
    /// Write to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    let config = default_config();
    match args.output {
        Some(path) => {
            save_config(&path, &config)?;
            success(&format!("Default configuration written to {}", path.display()));
        }
        None => print!("{}", toml::to_string_pretty(&config)?),
    }
    Ok(())
}
