//! Validation middleware
//!
//! Wraps a route so its handler only runs for bodies the gate accepts. The
//! decoded record is stored in the request extensions as [`Payload<T>`] and
//! handlers pick it up with the `Payload` extractor:
//!
//! ```ignore
//! let route = validated(post(register_handler), RouteValidation::new(gate, schema, limit));
//!
//! async fn register_handler(Payload(user): Payload<RegisterUser>) -> impl IntoResponse { ... }
//! ```

use std::ops::Deref;
use std::sync::Arc;

use axum::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::MethodRouter;
use http_body_util::LengthLimitError;
use uuid::Uuid;

use crate::gate::{ValidationGate, ValidationOutcome};
use crate::observability::{Event, Logger};
use crate::schema::SchemaDescriptor;

use super::errors::HttpError;

/// Per-route validation settings, used as the middleware state
pub struct RouteValidation<T> {
    gate: ValidationGate,
    schema: Arc<SchemaDescriptor<T>>,
    max_body_bytes: usize,
}

impl<T> RouteValidation<T> {
    pub fn new(gate: ValidationGate, schema: Arc<SchemaDescriptor<T>>, max_body_bytes: usize) -> Self {
        Self {
            gate,
            schema,
            max_body_bytes,
        }
    }

    pub fn gate(&self) -> &ValidationGate {
        &self.gate
    }

    pub fn schema(&self) -> &SchemaDescriptor<T> {
        &self.schema
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }
}

impl<T> Clone for RouteValidation<T> {
    fn clone(&self) -> Self {
        Self {
            gate: self.gate.clone(),
            schema: Arc::clone(&self.schema),
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// A record that passed validation
#[derive(Debug)]
pub struct Payload<T>(pub Arc<T>);

impl<T> Payload<T> {
    pub fn new(record: T) -> Self {
        Self(Arc::new(record))
    }

    pub fn into_inner(self) -> Arc<T> {
        self.0
    }
}

impl<T> Clone for Payload<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Payload<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for Payload<T>
where
    S: Send + Sync,
    T: Send + Sync + 'static,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Payload<T>>()
            .cloned()
            .ok_or(HttpError::MissingPayload)
    }
}

/// Identifier attached to every validated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Buffers a request body, failing once it grows past `limit` bytes
pub async fn read_body(body: Body, limit: usize) -> Result<Bytes, HttpError> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        if err.into_inner().downcast_ref::<LengthLimitError>().is_some() {
            HttpError::PayloadTooLarge { limit }
        } else {
            HttpError::BodyRead
        }
    })
}

/// Runs the gate over the request body before the wrapped handler.
pub async fn validate_payload<T>(
    State(validation): State<RouteValidation<T>>,
    request: Request,
    next: Next,
) -> Response
where
    T: Default + Send + Sync + 'static,
{
    let request_id = Uuid::new_v4().to_string();
    let (mut parts, body) = request.into_parts();

    let bytes = match read_body(body, validation.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            if let HttpError::PayloadTooLarge { limit } = &err {
                Logger::event(
                    Event::BodyTooLarge,
                    &[
                        ("limit", limit.to_string().as_str()),
                        ("request_id", request_id.as_str()),
                        ("schema", validation.schema.schema_id()),
                    ],
                );
            }
            return err.into_response();
        }
    };

    let outcome = validation
        .gate
        .validate_tagged(&bytes, &validation.schema, Some(&request_id));

    match outcome {
        ValidationOutcome::Accepted(record) => {
            parts.extensions.insert(Payload::new(record));
            parts.extensions.insert(RequestId(request_id));
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        ValidationOutcome::Rejected(rejection) => HttpError::from(rejection).into_response(),
    }
}

/// Puts the validation middleware in front of `route`.
pub fn validated<T, S>(route: MethodRouter<S>, validation: RouteValidation<T>) -> MethodRouter<S>
where
    T: Default + Send + Sync + 'static,
    S: Clone + Send + Sync + 'static,
{
    route.layer(middleware::from_fn_with_state(validation, validate_payload::<T>))
}
