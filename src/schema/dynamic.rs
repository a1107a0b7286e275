//! Records for schemas declared in files
//!
//! A `DynamicRecord` holds the decoded JSON values of a file-declared schema
//! keyed by field name. Type checks happen while decoding, so everything
//! stored in a record already matches its declared `FieldType`. Absent fields
//! read back as the zero value of their type.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use super::descriptor::{FieldAccess, FieldSpec, FieldValue, SchemaDescriptor};
use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldType, SchemaFile};

/// Decoded values of a file-declared schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DynamicRecord {
    values: HashMap<String, Value>,
}

impl DynamicRecord {
    /// Returns the decoded value of a field, if one was supplied
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Number of fields that were supplied in the payload
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Accessor for one field of a [`DynamicRecord`]
struct DynamicAccess {
    name: String,
    field_type: FieldType,
}

impl FieldAccess<DynamicRecord> for DynamicAccess {
    fn decode(&self, record: &mut DynamicRecord, raw: &RawValue) -> Result<(), String> {
        let value: Value = serde_json::from_str(raw.get()).map_err(|e| e.to_string())?;
        check_type(&value, &self.field_type, &self.name)?;
        record.values.insert(self.name.clone(), value);
        Ok(())
    }

    fn value<'a>(&self, record: &'a DynamicRecord) -> FieldValue<'a> {
        match record.values.get(&self.name) {
            Some(value) => view(value),
            None => zero_value(&self.field_type),
        }
    }
}

/// Checks a JSON value against a declared type.
fn check_type(value: &Value, expected: &FieldType, path: &str) -> Result<(), String> {
    let ok = match expected {
        FieldType::String => value.is_string(),
        // Must be an integer (not a float)
        FieldType::Int => value.is_i64() || value.is_u64(),
        // Accept both integers and floats as float
        FieldType::Float => value.is_number(),
        FieldType::Bool => value.is_boolean(),
        FieldType::Array { element_type } => {
            let arr = match value.as_array() {
                Some(arr) => arr,
                None => return Err(type_error(path, expected, value)),
            };
            for (i, elem) in arr.iter().enumerate() {
                check_type(elem, element_type, &format!("{}[{}]", path, i))?;
            }
            true
        }
    };

    if ok {
        Ok(())
    } else {
        Err(type_error(path, expected, value))
    }
}

fn type_error(path: &str, expected: &FieldType, actual: &Value) -> String {
    format!(
        "field '{}': expected {}, got {}",
        path,
        expected.type_name(),
        json_type_name(actual)
    )
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn view(value: &Value) -> FieldValue<'_> {
    match value {
        Value::String(s) => FieldValue::Str(s),
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                FieldValue::UInt(u)
            } else {
                FieldValue::Float(n.as_f64().unwrap_or_default())
            }
        }
        Value::Array(items) => FieldValue::List(items.len()),
        Value::Null | Value::Object(_) => FieldValue::Missing,
    }
}

fn zero_value(field_type: &FieldType) -> FieldValue<'static> {
    match field_type {
        FieldType::String => FieldValue::Str(""),
        FieldType::Int => FieldValue::Int(0),
        FieldType::Float => FieldValue::Float(0.0),
        FieldType::Bool => FieldValue::Bool(false),
        FieldType::Array { .. } => FieldValue::List(0),
    }
}

impl SchemaFile {
    /// Builds the runtime descriptor for this definition
    pub fn into_descriptor(self) -> SchemaResult<SchemaDescriptor<DynamicRecord>> {
        self.validate_structure()
            .map_err(|e| SchemaError::malformed_schema(format!("<{}>", self.schema_id), e))?;

        let mut builder = SchemaDescriptor::builder(self.schema_id);
        if let Some(description) = self.description {
            builder = builder.description(description);
        }

        for def in self.fields {
            let access = DynamicAccess {
                name: def.name.clone(),
                field_type: def.field_type,
            };
            let mut spec = FieldSpec::with_access(def.name, access).rules(def.rules);
            if let Some(key) = def.key {
                spec = spec.key(key);
            }
            builder = builder.field(spec);
        }

        builder.build()
    }
}
