//! CLI for phishblock.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use phishblock_core::config::{self, FeedConfig};
use std::path::{Path, PathBuf};

use commands::{run_check, run_checksum, run_feeds, run_sources};

/// Top-level CLI for phishblock.
#[derive(Debug, Parser)]
#[command(name = "phishblock", version)]
#[command(about = "Build 0.0.0.0 hosts blocklists from public phishing feeds", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/phishblock/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch feeds and rewrite their blocklist files.
    Run {
        /// Only run the named source (repeatable). Default: all sources.
        #[arg(long = "source", value_name = "NAME")]
        sources: Vec<String>,
    },

    /// List configured sources.
    Sources,

    /// Normalize inputs the way feed records are and print the result.
    Check {
        /// Reject URLs with a path, query or fragment instead of reducing them to their host.
        #[arg(long)]
        domain_only: bool,

        /// Raw records (URLs or domains).
        #[arg(required = true)]
        inputs: Vec<String>,
    },

    /// Compute SHA-256 of a blocklist file.
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> Result<FeedConfig> {
    let cfg = match path {
        Some(p) => config::load_from(p)?,
        None => {
            let cfg = config::load_or_init()?;
            cfg.validate()?;
            cfg
        }
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let config_path = cli.config.as_deref();

        match cli.command {
            CliCommand::Run { sources } => {
                let cfg = load_config(config_path)?;
                run_feeds(&cfg, &sources)?;
            }
            CliCommand::Sources => {
                let cfg = load_config(config_path)?;
                run_sources(&cfg);
            }
            CliCommand::Check {
                domain_only,
                inputs,
            } => run_check(&inputs, domain_only),
            CliCommand::Checksum { path } => run_checksum(&path)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
