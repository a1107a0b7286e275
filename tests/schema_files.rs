//! Schema File Tests
//!
//! Startup invariants for file-declared schemas:
//! - Malformed files, bad rules and duplicate ids abort loading
//! - Unknown schema ids are reported as rejections, not faults
//! - Decoding against a loaded schema is deterministic

use std::fs;

use payload_gate::gate::{RejectReason, ValidationGate};
use payload_gate::schema::{FieldDef, SchemaErrorCode, SchemaFile, SchemaLoader, Severity};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write(dir: &TempDir, file: &str, content: &str) {
    fs::write(dir.path().join(file), content).unwrap();
}

fn member_file(schema_id: &str) -> String {
    format!(
        r#"{{"schema_id":"{}","fields":[
            {{"name":"Handle","key":"handle","type":"string","rules":"required,alphanum,max=15"}},
            {{"name":"Tier","key":"tier","type":"string","rules":"oneof=free pro"}},
            {{"name":"Score","key":"score","type":"float","rules":"omitempty,max=100"}}
        ]}}"#,
        schema_id
    )
}

// =============================================================================
// Loading Tests
// =============================================================================

#[test]
fn test_loads_every_json_file() {
    let dir = TempDir::new().unwrap();
    write(&dir, "members.json", &member_file("members"));
    write(&dir, "guests.json", &member_file("guests"));
    write(&dir, "README.md", "not a schema");

    let mut loader = SchemaLoader::new(dir.path());
    loader.load_all().unwrap();

    assert_eq!(loader.schema_count(), 2);
    assert!(loader.get("members").is_some());
    assert!(loader.get("guests").is_some());
}

#[test]
fn test_missing_directory_loads_nothing() {
    let dir = TempDir::new().unwrap();
    let mut loader = SchemaLoader::new(&dir.path().join("absent"));
    loader.load_all().unwrap();
    assert_eq!(loader.schema_count(), 0);
}

#[test]
fn test_duplicate_schema_id_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(&dir, "a.json", &member_file("members"));
    write(&dir, "b.json", &member_file("members"));

    let mut loader = SchemaLoader::new(dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::GateDuplicateSchema);
    assert!(err.is_fatal());
}

#[test]
fn test_malformed_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    write(&dir, "broken.json", r#"{"schema_id": "broken", "fields": ["#);

    let mut loader = SchemaLoader::new(dir.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::GateMalformedSchema);
}

#[test]
fn test_duplicate_json_key_is_fatal() {
    let file = SchemaFile::new(
        "dupes",
        vec![
            FieldDef::string("First", "name", "required"),
            FieldDef::string("Second", "name", ""),
        ],
    );

    let mut loader = SchemaLoader::new(std::path::Path::new(""));
    let err = loader.register(file).unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::GateDuplicateKey);
}

#[test]
fn test_unknown_schema_is_a_rejection() {
    let loader = SchemaLoader::new(std::path::Path::new(""));
    let err = loader.require("nope").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::GateUnknownSchema);
    assert_eq!(err.severity(), Severity::Reject);
    assert!(!err.is_fatal());
}

// =============================================================================
// Validation Against Loaded Schemas
// =============================================================================

#[test]
fn test_loaded_schema_validates_deterministically() {
    let dir = TempDir::new().unwrap();
    write(&dir, "members.json", &member_file("members"));

    let mut loader = SchemaLoader::new(dir.path());
    loader.load_all().unwrap();
    let schema = loader.require("members").unwrap();

    let gate = ValidationGate::standard();
    gate.prepare(&schema).unwrap();

    for _ in 0..50 {
        let outcome = gate.validate_request(br#"{"handle":"ann42","tier":"pro","score":88.5}"#, &schema);
        assert!(outcome.is_accepted());

        let outcome = gate.validate_request(br#"{"handle":"ann 42","tier":"pro"}"#, &schema);
        assert_eq!(
            outcome.rejection().map(|r| r.message()),
            Some("Invalid input for handle")
        );
    }
}

#[test]
fn test_loaded_schema_rejects_wrong_types() {
    let dir = TempDir::new().unwrap();
    write(&dir, "members.json", &member_file("members"));

    let mut loader = SchemaLoader::new(dir.path());
    loader.load_all().unwrap();
    let schema = loader.require("members").unwrap();

    let gate = ValidationGate::standard();
    let outcome = gate.validate_request(br#"{"handle":"ann","tier":"free","score":"high"}"#, &schema);
    let rejection = outcome.rejection().unwrap();
    assert_eq!(rejection.reason(), RejectReason::FieldTypeMismatch);
    assert!(rejection.message().contains("Score"));

    let outcome = gate.validate_request(br#"{"handle":"ann","tier":"enterprise"}"#, &schema);
    assert_eq!(
        outcome.rejection().map(|r| r.message()),
        Some("Invalid input for tier")
    );
}
