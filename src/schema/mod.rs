//! Schema subsystem
//!
//! A schema is the explicit field table of one request record: field name,
//! JSON key and rule annotation per field. Schemas are declared in Rust with
//! [`SchemaDescriptor::builder`] and the [`field!`](crate::field) macro, or in
//! JSON files loaded by [`SchemaLoader`] at startup.
//!
//! # Design Principles
//!
//! - Built once, immutable afterwards, shared behind `Arc`
//! - Declaration order is evaluation order
//! - Annotation errors surface at startup, never per request
//! - Flat records only

mod descriptor;
mod dynamic;
mod errors;
mod loader;
mod rule;
mod types;

pub use descriptor::{
    FieldAccess, FieldKind, FieldSpec, FieldValue, SchemaBuilder, SchemaDescriptor,
};
pub use dynamic::DynamicRecord;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult, Severity};
pub use loader::{DynamicSchema, SchemaLoader};
pub use rule::{parse_rules, Rule, RuleKind};
pub use types::{FieldDef, FieldType, SchemaFile};
