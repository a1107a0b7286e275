//! Case-sensitive payload decoding
//!
//! The decoder maps JSON object keys to record fields through the explicit
//! key of each [`FieldSpec`](crate::schema::FieldSpec). Keys match exactly:
//! a body key `"Email"` never populates a field keyed `"email"`. Keys the
//! schema does not know are ignored, and fields whose key is absent keep the
//! record's zero value. Required-ness is left to the rule engine.

mod errors;
mod keyed;

pub use errors::{DecodeError, DecodeResult};
pub use keyed::{parse_payload, KeyedDecoder, RawPayload};
