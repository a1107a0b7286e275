//! Command-line interface
//!
//! - serve: load config and schemas, then run the HTTP server
//! - check-schemas: verify a schema directory without serving

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check_schemas, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
