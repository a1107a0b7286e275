//! payload-gate - strict, case-sensitive request payload validation
//!
//! A request body is decoded into a record by exact JSON key, checked
//! against declarative field rules, and either accepted or rejected with a
//! single message describing the first failed rule.
//!
//! ```ignore
//! use payload_gate::field;
//! use payload_gate::gate::{ValidationGate, ValidationOutcome};
//! use payload_gate::schema::SchemaDescriptor;
//!
//! #[derive(Default)]
//! struct Login { email: String }
//!
//! let schema = SchemaDescriptor::<Login>::builder("login")
//!     .field(field!(Login, email, "Email").key("email").rules("required,email"))
//!     .build()?;
//!
//! match ValidationGate::standard().validate_request(body, &schema) {
//!     ValidationOutcome::Accepted(login) => { /* ... */ }
//!     ValidationOutcome::Rejected(rejection) => { /* 400 + rejection.message() */ }
//! }
//! ```

pub mod cli;
pub mod decode;
pub mod gate;
pub mod http_server;
pub mod observability;
pub mod rules;
pub mod schema;
pub mod translate;
