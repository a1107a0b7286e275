//! Schema loader for file-declared schemas
//!
//! - Schemas are stored as `<schema_dir>/*.json`, one schema per file
//! - Files are read once at startup; the registry is read-only afterwards
//! - Any unreadable or malformed file aborts startup

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::descriptor::SchemaDescriptor;
use super::dynamic::DynamicRecord;
use super::errors::{SchemaError, SchemaResult};
use super::types::SchemaFile;

/// Shared handle to a file-declared schema
pub type DynamicSchema = Arc<SchemaDescriptor<DynamicRecord>>;

/// Reads schema files from disk and keeps them in an in-memory registry.
pub struct SchemaLoader {
    schema_dir: PathBuf,
    schemas: HashMap<String, DynamicSchema>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory.
    pub fn new(schema_dir: &Path) -> Self {
        Self {
            schema_dir: schema_dir.to_path_buf(),
            schemas: HashMap::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every `.json` file in the schema directory.
    ///
    /// A missing directory means there is nothing to load.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        if !self.schema_dir.exists() {
            return Ok(());
        }

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed_schema(
                self.schema_dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed_schema(
                    self.schema_dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }

        // Directory order is platform dependent; keep error reporting stable.
        paths.sort();
        for path in paths {
            self.load_schema_file(&path)?;
        }

        Ok(())
    }

    /// Loads a single schema file.
    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| {
            SchemaError::malformed_schema(
                path.display().to_string(),
                format!("Failed to read file: {}", e),
            )
        })?;

        let file: SchemaFile = serde_json::from_str(&content).map_err(|e| {
            SchemaError::malformed_schema(path.display().to_string(), format!("Invalid JSON: {}", e))
        })?;

        file.validate_structure()
            .map_err(|e| SchemaError::malformed_schema(path.display().to_string(), e))?;

        self.register(file)
    }

    /// Registers a schema definition directly.
    pub fn register(&mut self, file: SchemaFile) -> SchemaResult<()> {
        if self.schemas.contains_key(&file.schema_id) {
            return Err(SchemaError::duplicate_schema(&file.schema_id));
        }

        let descriptor = file.into_descriptor()?;
        self.schemas
            .insert(descriptor.schema_id().to_string(), Arc::new(descriptor));
        Ok(())
    }

    /// Gets a schema by ID.
    pub fn get(&self, schema_id: &str) -> Option<DynamicSchema> {
        self.schemas.get(schema_id).cloned()
    }

    /// Gets a schema by ID, failing with `GATE_UNKNOWN_SCHEMA`.
    pub fn require(&self, schema_id: &str) -> SchemaResult<DynamicSchema> {
        self.get(schema_id)
            .ok_or_else(|| SchemaError::unknown_schema(schema_id))
    }

    /// Returns all loaded schemas.
    pub fn all_schemas(&self) -> impl Iterator<Item = &DynamicSchema> {
        self.schemas.values()
    }

    /// Returns the number of loaded schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
