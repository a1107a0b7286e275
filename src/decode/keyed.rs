//! Keyed decoder

use std::collections::HashMap;

use serde_json::value::RawValue;

use crate::schema::SchemaDescriptor;

use super::errors::{DecodeError, DecodeResult};

/// Top-level keys of a request body mapped to their undecoded JSON fragments
pub type RawPayload = HashMap<String, Box<RawValue>>;

/// Parses a request body into a [`RawPayload`].
///
/// Fails with `MalformedBody` unless the body is a single JSON object.
pub fn parse_payload(body: &[u8]) -> DecodeResult<RawPayload> {
    Ok(serde_json::from_slice::<RawPayload>(body)?)
}

/// Decodes request bodies into records using a schema's field table.
pub struct KeyedDecoder;

impl KeyedDecoder {
    /// Decodes `body` into a fresh `T`.
    ///
    /// Only fields that declare a JSON key are considered, and the key must
    /// match exactly. A `null` fragment leaves the field at its zero value.
    pub fn decode<T: Default>(body: &[u8], schema: &SchemaDescriptor<T>) -> DecodeResult<T> {
        let payload = parse_payload(body)?;
        Self::decode_payload(&payload, schema)
    }

    /// Decodes an already parsed payload into a fresh `T`.
    pub fn decode_payload<T: Default>(
        payload: &RawPayload,
        schema: &SchemaDescriptor<T>,
    ) -> DecodeResult<T> {
        let mut record = T::default();

        for field in schema.fields() {
            let Some(key) = field.json_key() else {
                continue;
            };
            let Some(fragment) = payload.get(key) else {
                continue;
            };
            if fragment.get().trim() == "null" {
                continue;
            }

            field
                .decode_into(&mut record, fragment)
                .map_err(|message| DecodeError::FieldTypeMismatch {
                    field: field.name().to_string(),
                    key: key.to_string(),
                    message,
                })?;
        }

        Ok(record)
    }
}
