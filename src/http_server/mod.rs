//! # HTTP binding
//!
//! Hosts the validation gate in an axum server.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/users/register` - Registration, validated by middleware
//! - `/schemas/:schema_id/validate` - Validation against file-declared schemas

pub mod config;
pub mod errors;
pub mod middleware;
pub mod routes;
pub mod server;

pub use config::{ConfigError, HttpServerConfig};
pub use errors::{ErrorResponse, HttpError};
pub use middleware::{read_body, validate_payload, validated, Payload, RequestId, RouteValidation};
pub use routes::{GateState, RegisterUser};
pub use server::HttpServer;
