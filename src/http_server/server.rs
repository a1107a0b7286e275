//! # HTTP Server
//!
//! Combines the health and validation routers behind a CORS layer.

use std::io;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::gate::ValidationGate;
use crate::observability::{Event, Logger};
use crate::schema::{SchemaLoader, SchemaResult};

use super::config::HttpServerConfig;
use super::routes::{health_routes, validation_routes, GateState};

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Builds a server with the standard gate, loading schema files from
    /// `config.schema_dir` when set.
    pub fn with_config(config: HttpServerConfig) -> SchemaResult<Self> {
        let schemas = match &config.schema_dir {
            Some(dir) => {
                let mut loader = SchemaLoader::new(dir);
                loader.load_all()?;
                loader
            }
            None => SchemaLoader::new(Path::new("")),
        };

        Logger::event(
            Event::SchemasLoaded,
            &[
                ("count", schemas.schema_count().to_string().as_str()),
                ("dir", schemas.schema_dir().display().to_string().as_str()),
            ],
        );

        Self::with_gate(config, ValidationGate::standard(), schemas)
    }

    /// Builds a server around an explicit gate and schema set
    pub fn with_gate(
        config: HttpServerConfig,
        gate: ValidationGate,
        schemas: SchemaLoader,
    ) -> SchemaResult<Self> {
        let state = Arc::new(GateState {
            gate,
            schemas,
            max_body_bytes: config.max_body_bytes,
        });
        let router = Self::build_router(&config, state)?;
        Ok(Self { config, router })
    }

    fn build_router(config: &HttpServerConfig, state: Arc<GateState>) -> SchemaResult<Router> {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Ok(Router::new()
            .merge(health_routes())
            .merge(validation_routes(state)?)
            .layer(cors))
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Binds the listener and serves until the process stops
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("{}", e)))?;

        let listener = TcpListener::bind(addr).await?;
        Logger::event(Event::ServerStart, &[("addr", addr.to_string().as_str())]);

        axum::serve(listener, self.router).await?;

        Logger::event(Event::ServerStop, &[("addr", addr.to_string().as_str())]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(9090)).unwrap();
        assert_eq!(server.socket_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_server_loads_schema_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("contact.json"),
            r#"{"schema_id":"contact","fields":[{"name":"Name","key":"name","type":"string","rules":"required"}]}"#,
        )
        .unwrap();

        let config = HttpServerConfig {
            schema_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        assert!(HttpServer::with_config(config).is_ok());
    }

    #[test]
    fn test_unsupported_rule_fails_startup() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("contact.json"),
            r#"{"schema_id":"contact","fields":[{"name":"Zip","key":"zip","type":"string","rules":"postcode"}]}"#,
        )
        .unwrap();

        let config = HttpServerConfig {
            schema_dir: Some(dir.path().to_path_buf()),
            ..Default::default()
        };
        let err = HttpServer::with_config(config).err().unwrap();
        assert_eq!(err.code(), crate::schema::SchemaErrorCode::GateUnsupportedRule);
    }
}
