//! Routes
//!
//! - `GET /health`
//! - `POST /users/register`: compiled-in schema, handler reads `Payload<RegisterUser>`
//! - `POST /schemas/:schema_id/validate`: validates against a file-declared schema

use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::field;
use crate::gate::ValidationGate;
use crate::schema::{SchemaDescriptor, SchemaLoader, SchemaResult};

use super::errors::HttpError;
use super::middleware::{read_body, validated, Payload, RequestId, RouteValidation};

/// Shared state for the validation routes
pub struct GateState {
    pub gate: ValidationGate,
    pub schemas: SchemaLoader,
    pub max_body_bytes: usize,
}

/// Registration body
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

impl RegisterUser {
    pub fn schema() -> SchemaResult<SchemaDescriptor<Self>> {
        SchemaDescriptor::<Self>::builder("register_user")
            .description("User registration")
            .field(field!(RegisterUser, name, "Name").key("name").rules("required,min=3,max=50"))
            .field(field!(RegisterUser, email, "Email").key("email").rules("required,email"))
            .field(field!(RegisterUser, phone, "Phone").key("phone").rules("required,phone"))
            .field(field!(RegisterUser, password, "Password").key("password").rules("required,min=8"))
            .build()
    }
}

/// Registration echo. The password never leaves the server.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub request_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

/// Builds the validation routes, checking every schema against the gate.
pub fn validation_routes(state: Arc<GateState>) -> SchemaResult<Router> {
    let register_schema = RegisterUser::schema()?;
    state.gate.prepare(&register_schema)?;
    let register = RouteValidation::new(
        state.gate.clone(),
        Arc::new(register_schema),
        state.max_body_bytes,
    );

    for schema in state.schemas.all_schemas() {
        state.gate.prepare(schema)?;
    }

    Ok(Router::new()
        .route("/users/register", validated(post(register_handler), register))
        .route("/schemas/:schema_id/validate", post(schema_validate_handler))
        .with_state(state))
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn register_handler(
    Payload(user): Payload<RegisterUser>,
    Extension(RequestId(request_id)): Extension<RequestId>,
) -> impl IntoResponse {
    let response = RegisteredUser {
        request_id,
        name: user.name.clone(),
        email: user.email.clone(),
        phone: user.phone.clone(),
    };

    (StatusCode::CREATED, Json(response))
}

async fn schema_validate_handler(
    State(state): State<Arc<GateState>>,
    Path(schema_id): Path<String>,
    request: Request,
) -> Result<Json<Value>, HttpError> {
    let schema = state
        .schemas
        .require(&schema_id)
        .map_err(HttpError::UnknownSchema)?;

    let bytes = read_body(request.into_body(), state.max_body_bytes).await?;
    let request_id = Uuid::new_v4().to_string();

    let record = state
        .gate
        .validate_tagged(&bytes, &schema, Some(&request_id))
        .into_result()?;

    Ok(Json(json!({
        "schema_id": schema_id,
        "request_id": request_id,
        "record": record,
    })))
}
