//! Error definitions shared across library modules.
//! Each type models a specific failure scenario (gear parsing, telemetry
//! decoding). Link failures are represented by the adapter's own
//! associated error type and never escalate past the session runner.
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while parsing a gear identifier from the outside world
/// (key bindings, settings). The [`crate::core::GearId`] set is closed,
/// so once parsed a gear can never be invalid again.
pub enum GearIdError {
    /// Character does not name any gear in {N, R, 1..7}.
    #[error("Unknown gear identifier: {0}")]
    UnknownGear(char),
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// Errors raised while decoding one inbound telemetry line. Always
/// recovered locally: the offending line is dropped and the vehicle
/// state stays at its last known-good values.
pub enum TelemetryParseError {
    /// Line bytes are not valid UTF-8.
    #[error("Telemetry line is not valid UTF-8")]
    NotUtf8,
    /// Line overran the fixed line buffer and was cut; a cut token must
    /// not be decoded as a shorter valid value.
    #[error("Telemetry line exceeds the line buffer capacity")]
    LineTooLong,
    /// A recognized `KEY=value` token carries a malformed integer; the
    /// entire line is discarded.
    #[error("Malformed integer for {key}")]
    MalformedInteger { key: &'static str },
}
