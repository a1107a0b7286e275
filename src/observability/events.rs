//! Observable events
//!
//! Events are explicit and typed. Each carries a default severity used by
//! [`Logger::event`](super::Logger::event).

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded
    ConfigLoaded,
    /// Schema files loaded and prepared
    SchemasLoaded,
    /// Listener bound, serving requests
    ServerStart,
    /// Listener stopped
    ServerStop,
    /// Startup failed
    BootFailed,

    // Per request
    /// Body decoded and all rules passed
    PayloadAccepted,
    /// Body could not be decoded into the record
    DecodeRejected,
    /// A rule failed
    RuleRejected,
    /// Body exceeded the configured limit
    BodyTooLarge,
    /// A panic was caught while validating
    InternalFault,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::SchemasLoaded => "SCHEMAS_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::BootFailed => "BOOT_FAILED",
            Event::PayloadAccepted => "PAYLOAD_ACCEPTED",
            Event::DecodeRejected => "DECODE_REJECTED",
            Event::RuleRejected => "RULE_REJECTED",
            Event::BodyTooLarge => "BODY_TOO_LARGE",
            Event::InternalFault => "INTERNAL_FAULT",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::PayloadAccepted => Severity::Trace,
            Event::DecodeRejected | Event::RuleRejected | Event::BodyTooLarge => Severity::Warn,
            Event::InternalFault => Severity::Error,
            Event::BootFailed => Severity::Fatal,
            Event::ConfigLoaded
            | Event::SchemasLoaded
            | Event::ServerStart
            | Event::ServerStop => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Event; 10] = [
        Event::ConfigLoaded,
        Event::SchemasLoaded,
        Event::ServerStart,
        Event::ServerStop,
        Event::BootFailed,
        Event::PayloadAccepted,
        Event::DecodeRejected,
        Event::RuleRejected,
        Event::BodyTooLarge,
        Event::InternalFault,
    ];

    #[test]
    fn test_all_events_have_string_representation() {
        for event in ALL {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_rejections_are_warnings() {
        assert_eq!(Event::DecodeRejected.severity(), Severity::Warn);
        assert_eq!(Event::RuleRejected.severity(), Severity::Warn);
        assert_eq!(Event::InternalFault.severity(), Severity::Error);
        assert_eq!(Event::PayloadAccepted.severity(), Severity::Trace);
    }

    #[test]
    fn test_only_boot_failure_is_fatal() {
        for event in ALL {
            assert_eq!(event.severity() == Severity::Fatal, event == Event::BootFailed);
        }
    }
}
