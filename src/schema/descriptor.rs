//! Schema descriptors
//!
//! A `SchemaDescriptor<T>` is the explicit field table for one record type:
//! for every field a name, an optional JSON key, the parsed rules and an
//! accessor that knows how to write a decoded JSON fragment into the field
//! and how to read the field back for rule evaluation.
//!
//! Descriptors are built once at startup and never mutated afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::de::DeserializeOwned;
use serde_json::value::RawValue;
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::rule::{parse_rules, Rule};

/// Read-only view of a field value as seen by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    /// A list, reduced to its length
    List(usize),
    /// An optional field that holds nothing
    Missing,
}

impl FieldValue<'_> {
    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Int(n) => *n == 0,
            FieldValue::UInt(n) => *n == 0,
            FieldValue::Float(n) => *n == 0.0,
            FieldValue::Bool(b) => !b,
            FieldValue::List(len) => *len == 0,
            FieldValue::Missing => true,
        }
    }

    /// Renders the value as JSON. Lists render as their length.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Str(s) => Value::from(*s),
            FieldValue::Int(n) => Value::from(*n),
            FieldValue::UInt(n) => Value::from(*n),
            FieldValue::Float(n) => Value::from(*n),
            FieldValue::Bool(b) => Value::from(*b),
            FieldValue::List(len) => Value::from(*len),
            FieldValue::Missing => Value::Null,
        }
    }
}

/// Rust types that can back a schema field.
pub trait FieldKind {
    fn field_value(&self) -> FieldValue<'_>;
}

impl FieldKind for String {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Str(self)
    }
}

impl FieldKind for bool {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Bool(*self)
    }
}

macro_rules! signed_field_kind {
    ($($ty:ty),*) => {
        $(impl FieldKind for $ty {
            fn field_value(&self) -> FieldValue<'_> {
                FieldValue::Int(*self as i64)
            }
        })*
    };
}

macro_rules! unsigned_field_kind {
    ($($ty:ty),*) => {
        $(impl FieldKind for $ty {
            fn field_value(&self) -> FieldValue<'_> {
                FieldValue::UInt(*self as u64)
            }
        })*
    };
}

signed_field_kind!(i8, i16, i32, i64, isize);
unsigned_field_kind!(u8, u16, u32, u64, usize);

impl FieldKind for f32 {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(f64::from(*self))
    }
}

impl FieldKind for f64 {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::Float(*self)
    }
}

impl<F: FieldKind> FieldKind for Option<F> {
    fn field_value(&self) -> FieldValue<'_> {
        match self {
            Some(inner) => inner.field_value(),
            None => FieldValue::Missing,
        }
    }
}

impl<F> FieldKind for Vec<F> {
    fn field_value(&self) -> FieldValue<'_> {
        FieldValue::List(self.len())
    }
}

/// Writes and reads one field of a record.
pub trait FieldAccess<T>: Send + Sync {
    /// Decodes a JSON fragment into the field.
    ///
    /// Returns a description of the mismatch when the fragment's JSON type
    /// cannot be converted to the field type.
    fn decode(&self, record: &mut T, raw: &RawValue) -> Result<(), String>;

    /// Reads the current value of the field.
    fn value<'a>(&self, record: &'a T) -> FieldValue<'a>;
}

/// Accessor over a statically typed struct field.
struct TypedAccess<T, F> {
    get: fn(&T) -> &F,
    get_mut: fn(&mut T) -> &mut F,
}

impl<T, F> FieldAccess<T> for TypedAccess<T, F>
where
    F: FieldKind + DeserializeOwned + 'static,
{
    fn decode(&self, record: &mut T, raw: &RawValue) -> Result<(), String> {
        let value: F = serde_json::from_str(raw.get()).map_err(|e| e.to_string())?;
        *(self.get_mut)(record) = value;
        Ok(())
    }

    fn value<'a>(&self, record: &'a T) -> FieldValue<'a> {
        (self.get)(record).field_value()
    }
}

/// One entry of a schema's field table
pub struct FieldSpec<T> {
    name: String,
    json_key: Option<String>,
    annotation: String,
    rules: Vec<Rule>,
    access: Box<dyn FieldAccess<T>>,
}

impl<T: 'static> FieldSpec<T> {
    /// Creates a field backed by a struct member.
    ///
    /// Prefer the [`field!`](crate::field) macro, which fills in both
    /// accessors from the member name.
    pub fn typed<F>(name: impl Into<String>, get: fn(&T) -> &F, get_mut: fn(&mut T) -> &mut F) -> Self
    where
        F: FieldKind + DeserializeOwned + 'static,
    {
        Self::with_access(name, TypedAccess { get, get_mut })
    }

    /// Creates a field backed by a custom accessor
    pub fn with_access(name: impl Into<String>, access: impl FieldAccess<T> + 'static) -> Self {
        Self {
            name: name.into(),
            json_key: None,
            annotation: String::new(),
            rules: Vec::new(),
            access: Box::new(access),
        }
    }
}

impl<T> FieldSpec<T> {
    /// Sets the JSON key this field is decoded from (matched case-sensitively)
    pub fn key(mut self, json_key: impl Into<String>) -> Self {
        self.json_key = Some(json_key.into());
        self
    }

    /// Sets the rule annotation, e.g. `required,min=3`
    pub fn rules(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = annotation.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn json_key(&self) -> Option<&str> {
        self.json_key.as_deref()
    }

    /// Parsed rules, in annotation order
    pub fn rule_list(&self) -> &[Rule] {
        &self.rules
    }

    /// Decodes a JSON fragment into this field of `record`
    pub fn decode_into(&self, record: &mut T, raw: &RawValue) -> Result<(), String> {
        self.access.decode(record, raw)
    }

    /// Reads this field of `record`
    pub fn value<'a>(&self, record: &'a T) -> FieldValue<'a> {
        self.access.value(record)
    }
}

impl<T> fmt::Debug for FieldSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("name", &self.name)
            .field("json_key", &self.json_key)
            .field("rules", &self.rules)
            .finish()
    }
}

/// Immutable field table for one record type
pub struct SchemaDescriptor<T> {
    schema_id: String,
    description: Option<String>,
    fields: Vec<FieldSpec<T>>,
}

impl<T> SchemaDescriptor<T> {
    /// Starts building a descriptor
    pub fn builder(schema_id: impl Into<String>) -> SchemaBuilder<T> {
        SchemaBuilder {
            schema_id: schema_id.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn schema_id(&self) -> &str {
        &self.schema_id
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldSpec<T>] {
        &self.fields
    }

    /// Looks up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldSpec<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Renders a record as a JSON object keyed by field name
    pub fn render(&self, record: &T) -> Value {
        let map = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.value(record).to_json()))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }
}

impl<T> fmt::Debug for SchemaDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDescriptor")
            .field("schema_id", &self.schema_id)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Builder for [`SchemaDescriptor`]
pub struct SchemaBuilder<T> {
    schema_id: String,
    description: Option<String>,
    fields: Vec<FieldSpec<T>>,
}

impl<T> SchemaBuilder<T> {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Appends a field. Declaration order is evaluation order.
    pub fn field(mut self, field: FieldSpec<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Parses every rule annotation and checks key uniqueness.
    pub fn build(mut self) -> SchemaResult<SchemaDescriptor<T>> {
        let mut keys = HashSet::new();

        for field in &mut self.fields {
            field.rules = parse_rules(&field.annotation)
                .map_err(|reason| SchemaError::invalid_rule(&self.schema_id, &field.name, reason))?;

            if let Some(key) = &field.json_key {
                if !keys.insert(key.clone()) {
                    return Err(SchemaError::duplicate_key(&self.schema_id, key));
                }
            }
        }

        Ok(SchemaDescriptor {
            schema_id: self.schema_id,
            description: self.description,
            fields: self.fields,
        })
    }
}

/// Builds a [`FieldSpec`] for a struct member.
///
/// ```ignore
/// let name = field!(Signup, name).key("name").rules("required,min=3");
/// let phone = field!(Signup, phone_number, "PhoneNumber").key("phone");
/// ```
#[macro_export]
macro_rules! field {
    ($record:ty, $member:ident) => {
        $crate::field!($record, $member, stringify!($member))
    };
    ($record:ty, $member:ident, $name:expr) => {
        $crate::schema::FieldSpec::<$record>::typed(
            $name,
            |r: &$record| &r.$member,
            |r: &mut $record| &mut r.$member,
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{RuleKind, SchemaErrorCode};

    #[derive(Debug, Default)]
    struct Account {
        name: String,
        age: u32,
        nickname: Option<String>,
        tags: Vec<String>,
    }

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    #[test]
    fn test_build_parses_rules_in_order() {
        let schema = SchemaDescriptor::<Account>::builder("accounts")
            .field(crate::field!(Account, name).key("name").rules("required,min=3"))
            .field(crate::field!(Account, age).key("age"))
            .build()
            .unwrap();

        let name = schema.field("name").unwrap();
        assert_eq!(name.rule_list().len(), 2);
        assert_eq!(name.rule_list()[0].kind, RuleKind::Required);
        assert!(schema.field("age").unwrap().rule_list().is_empty());
    }

    #[test]
    fn test_build_rejects_bad_annotation() {
        let err = SchemaDescriptor::<Account>::builder("accounts")
            .field(crate::field!(Account, name).key("name").rules("min=abc"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::GateInvalidRule);
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_build_rejects_non_finite_bound() {
        let err = SchemaDescriptor::<Account>::builder("accounts")
            .field(crate::field!(Account, name).key("name").rules("required,min=NaN"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::GateInvalidRule);
    }

    #[test]
    fn test_build_rejects_duplicate_keys() {
        let err = SchemaDescriptor::<Account>::builder("accounts")
            .field(crate::field!(Account, name).key("name"))
            .field(crate::field!(Account, nickname).key("name"))
            .build()
            .unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::GateDuplicateKey);
    }

    #[test]
    fn test_typed_access_round_trip() {
        let spec = crate::field!(Account, age);
        let mut account = Account::default();
        spec.decode_into(&mut account, &raw("42")).unwrap();
        assert_eq!(account.age, 42);
        assert_eq!(spec.value(&account), FieldValue::UInt(42));
    }

    #[test]
    fn test_typed_access_reports_type_mismatch() {
        let spec = crate::field!(Account, age);
        let mut account = Account::default();
        let err = spec.decode_into(&mut account, &raw("\"forty\"")).unwrap_err();
        assert!(err.contains("invalid type"));
        assert_eq!(account.age, 0);
    }

    #[test]
    fn test_option_and_list_views() {
        let mut account = Account::default();
        let nickname = crate::field!(Account, nickname);
        let tags = crate::field!(Account, tags);
        assert_eq!(nickname.value(&account), FieldValue::Missing);
        assert_eq!(tags.value(&account), FieldValue::List(0));

        tags.decode_into(&mut account, &raw(r#"["a","b"]"#)).unwrap();
        assert_eq!(tags.value(&account), FieldValue::List(2));
    }

    #[test]
    fn test_custom_display_name() {
        let spec = crate::field!(Account, nickname, "Nickname");
        assert_eq!(spec.name(), "Nickname");
    }

    #[test]
    fn test_zero_values() {
        assert!(FieldValue::Str("").is_zero());
        assert!(FieldValue::Float(0.0).is_zero());
        assert!(FieldValue::Bool(false).is_zero());
        assert!(FieldValue::Missing.is_zero());
        assert!(!FieldValue::Int(-1).is_zero());
        assert!(!FieldValue::List(1).is_zero());
    }

    #[test]
    fn test_present_empty_list_is_zero() {
        let mut account = Account::default();
        let tags = crate::field!(Account, tags);
        tags.decode_into(&mut account, &raw("[]")).unwrap();
        assert_eq!(tags.value(&account), FieldValue::List(0));
        assert!(tags.value(&account).is_zero());
    }

    #[test]
    fn test_render_uses_field_names() {
        let schema = SchemaDescriptor::<Account>::builder("accounts")
            .field(crate::field!(Account, name, "Name").key("name"))
            .field(crate::field!(Account, age, "Age").key("age"))
            .build()
            .unwrap();
        let account = Account {
            name: "Ann".into(),
            age: 7,
            ..Default::default()
        };
        let rendered = schema.render(&account);
        assert_eq!(rendered["Name"], "Ann");
        assert_eq!(rendered["Age"], 7);
    }
}
