//! Schema file definitions
//!
//! Schemas can be declared in JSON instead of Rust. Supported field types:
//! - string: UTF-8 string
//! - int: 64-bit integer
//! - float: 64-bit floating point (integers accepted)
//! - bool: Boolean
//! - array: Homogeneous array with element type
//!
//! Records are flat; there is no object type.

use serde::{Deserialize, Serialize};

/// Supported field types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Homogeneous array with single element type
    Array {
        /// Element type (boxed to allow recursive types)
        element_type: Box<FieldType>,
    },
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Array { .. } => "array",
        }
    }
}

/// One field of a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name used in messages
    pub name: String,
    /// JSON key; a field without a key is never decoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Field data type
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Rule annotation, e.g. `required,min=3`
    #[serde(default)]
    pub rules: String,
}

impl FieldDef {
    /// Create a string field decoded from `key`
    pub fn string(name: impl Into<String>, key: impl Into<String>, rules: impl Into<String>) -> Self {
        Self::keyed(name, key, FieldType::String, rules)
    }

    /// Create an int field decoded from `key`
    pub fn int(name: impl Into<String>, key: impl Into<String>, rules: impl Into<String>) -> Self {
        Self::keyed(name, key, FieldType::Int, rules)
    }

    /// Create a field of any type decoded from `key`
    pub fn keyed(
        name: impl Into<String>,
        key: impl Into<String>,
        field_type: FieldType,
        rules: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: Some(key.into()),
            field_type,
            rules: rules.into(),
        }
    }
}

/// Schema file contents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Unique schema identifier
    pub schema_id: String,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field definitions in evaluation order
    pub fields: Vec<FieldDef>,
}

impl SchemaFile {
    /// Create a new schema definition
    pub fn new(schema_id: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            schema_id: schema_id.into(),
            description: None,
            fields,
        }
    }

    /// Validates the definition itself (not a payload)
    pub fn validate_structure(&self) -> Result<(), String> {
        if self.schema_id.trim().is_empty() {
            return Err("schema_id must not be empty".into());
        }
        if self.fields.is_empty() {
            return Err("schema must declare at least one field".into());
        }

        for (i, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(format!("field #{} has an empty name", i));
            }
            if self.fields[..i].iter().any(|f| f.name == field.name) {
                return Err(format!("field '{}' is declared twice", field.name));
            }
            if let FieldType::Array { element_type } = &field.field_type {
                if matches!(**element_type, FieldType::Array { .. }) {
                    return Err(format!("field '{}' nests arrays", field.name));
                }
            }
        }

        Ok(())
    }
}
