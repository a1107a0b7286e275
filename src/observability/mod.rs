//! Observability
//!
//! Structured JSON line logging with typed events. Observability is
//! read-only: logging never changes the outcome of a request.
//!
//! ```ignore
//! use payload_gate::observability::{Event, Logger, Severity};
//!
//! Logger::event(Event::ServerStart, &[("addr", "0.0.0.0:8080")]);
//! Logger::log(Severity::Warn, "CUSTOM_EVENT", &[("detail", "x")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
