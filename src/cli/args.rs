//! CLI argument definitions using clap
//!
//! Commands:
//! - payload-gate serve [--config <path>] [--port <n>]
//! - payload-gate check-schemas --dir <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// payload-gate - strict, case-sensitive request payload validation
#[derive(Parser, Debug)]
#[command(name = "payload-gate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Load every schema file in a directory and report problems
    CheckSchemas {
        /// Directory holding `*.json` schema files
        #[arg(long)]
        dir: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from(["payload-gate", "serve", "--port", "9000"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert!(config.is_none());
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_check_schemas_requires_dir() {
        assert!(Cli::try_parse_from(["payload-gate", "check-schemas"]).is_err());
        let cli = Cli::try_parse_from(["payload-gate", "check-schemas", "--dir", "./schemas"]).unwrap();
        assert!(matches!(cli.command, Command::CheckSchemas { .. }));
    }
}
