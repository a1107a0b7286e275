//! CLI command implementations

use std::path::Path;

use crate::gate::ValidationGate;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{Event, Logger};
use crate::schema::SchemaLoader;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::CheckSchemas { dir } => check_schemas(&dir).map(|_| ()),
    }
}

/// Resolves the effective server configuration
pub fn load_config(config_path: Option<&Path>, port: Option<u16>) -> CliResult<HttpServerConfig> {
    let mut config = match config_path {
        Some(path) => {
            let config = HttpServerConfig::load(path)?;
            Logger::event(Event::ConfigLoaded, &[("path", path.display().to_string().as_str())]);
            config
        }
        None => HttpServerConfig::default(),
    };

    if let Some(port) = port {
        config.port = port;
        config.validate()?;
    }

    Ok(config)
}

/// Start the HTTP server
///
/// 1. Configuration load
/// 2. Schema load and rule check
/// 3. Bind and serve
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let config = load_config(config_path, port)?;

    let server = HttpServer::with_config(config).map_err(|e| {
        Logger::event(Event::BootFailed, &[("error", e.to_string().as_str())]);
        CliError::from(e)
    })?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Loads every schema in `dir` and checks its rules against the standard
/// gate. Returns the number of schemas checked.
pub fn check_schemas(dir: &Path) -> CliResult<usize> {
    if !dir.is_dir() {
        return Err(CliError::config_error(format!(
            "Schema directory not found: {}",
            dir.display()
        )));
    }

    let mut loader = SchemaLoader::new(dir);
    loader.load_all()?;

    let gate = ValidationGate::standard();
    let mut ids: Vec<_> = loader.all_schemas().map(|s| s.schema_id().to_string()).collect();
    ids.sort();

    for schema in loader.all_schemas() {
        gate.prepare(schema)?;
    }

    let count = ids.len().to_string();
    let joined = ids.join(",");
    Logger::event(
        Event::SchemasLoaded,
        &[("count", count.as_str()), ("schemas", joined.as_str())],
    );

    Ok(ids.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_defaults_and_port_override() {
        let config = load_config(None, None).unwrap();
        assert_eq!(config.port, 8080);

        let config = load_config(None, Some(3000)).unwrap();
        assert_eq!(config.port, 3000);

        let err = load_config(None, Some(0)).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gate.json");
        fs::write(&path, r#"{"host": "127.0.0.1", "max_body_bytes": 4096}"#).unwrap();

        let config = load_config(Some(&path), Some(7000)).unwrap();
        assert_eq!(config.socket_addr(), "127.0.0.1:7000");
        assert_eq!(config.max_body_bytes, 4096);
    }

    #[test]
    fn test_check_schemas_counts_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"schema_id":"a","fields":[{"name":"Phone","key":"phone","type":"string","rules":"required,phone"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("b.json"),
            r#"{"schema_id":"b","fields":[{"name":"Age","key":"age","type":"int","rules":"omitempty,min=18"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(check_schemas(dir.path()).unwrap(), 2);
    }

    #[test]
    fn test_check_schemas_reports_bad_rule() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a.json"),
            r#"{"schema_id":"a","fields":[{"name":"Name","key":"name","type":"string","rules":"min=abc"}]}"#,
        )
        .unwrap();

        let err = check_schemas(dir.path()).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::SchemaError);
        assert!(err.message().contains("GATE_INVALID_RULE"));
    }

    #[test]
    fn test_check_schemas_missing_dir() {
        let dir = TempDir::new().unwrap();
        let err = check_schemas(&dir.path().join("absent")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
