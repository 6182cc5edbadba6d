//! Command-line surface.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::build::{self, BuildOptions};
use crate::domain::model::BuildMode;
use crate::infra::config::DEFAULT_CONFIG_FILE;

/// Build a static site from a JSON build description.
#[derive(Debug, Parser)]
#[command(name = "webbuild", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). `WEBBUILD_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build every configured path into OUTPUT.
    Build {
        /// Root directory for build output.
        output: PathBuf,

        /// Use the debug section and skip minification.
        #[arg(long)]
        debug: bool,

        /// Build description to load.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Treat unknown action names as errors.
        #[arg(long)]
        strict: bool,
    },
    /// Print shell completions to stdout.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Build {
            output,
            debug,
            config,
            strict,
        } => {
            let options = BuildOptions {
                output,
                config,
                mode: BuildMode::from_debug_flag(debug),
                strict,
            };
            let summary = build::build(&options).with_context(|| {
                format!(
                    "{} build into {} failed",
                    options.mode.as_str(),
                    options.output.display()
                )
            })?;
            println!("{summary}");
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        }
    }
    Ok(())
}
