//! Wire codec: driver intents out, telemetry lines in.
//!
//! Outbound traffic is single ASCII bytes (`a r i d p` plus the literal
//! gear digits `1`..`7`). Inbound traffic is text lines of
//! whitespace-separated `KEY=value` tokens, typically `VEL=155 RPM=1200`.
use crate::core::{DriveMode, GearId, Intent, LineBytes, TelemetryFrame};
use crate::error::TelemetryParseError;

//==================================================================================WIRE_COMMANDS

/// One outbound command, exactly one byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireCommand {
    Forward,
    Reverse,
    SteerLeft,
    SteerRight,
    /// Stop / neutral drive, also sent when no movement key is held.
    Halt,
    /// Select a forward gear. Built through [`WireCommand::for_gear`],
    /// which only admits `1`..`7`.
    SelectGear(GearId),
}

impl WireCommand {
    /// Gear-selection command for the given gear.
    ///
    /// The vehicle protocol only defines gear bytes for the forward
    /// gears; selecting N or R stays local and returns `None`.
    pub fn for_gear(gear: GearId) -> Option<Self> {
        gear.is_numeric().then_some(WireCommand::SelectGear(gear))
    }

    /// ASCII byte transmitted for this command.
    pub fn encode(self) -> u8 {
        match self {
            WireCommand::Forward => b'a',
            WireCommand::Reverse => b'r',
            WireCommand::SteerLeft => b'i',
            WireCommand::SteerRight => b'd',
            WireCommand::Halt => b'p',
            WireCommand::SelectGear(gear) => gear.as_char() as u8,
        }
    }
}

/// Wire command for a movement intent, if the intent reaches the wire at
/// all in the given mode.
///
/// Simulation mode never transmits. Gear shifts and cycling are resolved
/// by the state machine (the cycled-to gear depends on current state), so
/// they are not handled here.
pub fn encode_movement(intent: Intent, mode: DriveMode) -> Option<WireCommand> {
    if mode == DriveMode::Simulation {
        return None;
    }
    match intent {
        Intent::Accelerate => Some(WireCommand::Forward),
        Intent::Decelerate => Some(WireCommand::Reverse),
        Intent::SteerLeft => Some(WireCommand::SteerLeft),
        Intent::SteerRight => Some(WireCommand::SteerRight),
        Intent::Stop => Some(WireCommand::Halt),
        _ => None,
    }
}

//==================================================================================TELEMETRY_DECODING

/// Decode one telemetry line into a frame.
///
/// Tokens are whitespace-separated `KEY=value` pairs in any order. `VEL`
/// and `RPM` are recognized; unknown tokens (with or without `=`) are
/// ignored; a recognized token with a malformed integer poisons the whole
/// line. A line missing a key yields `None` for that field.
pub fn decode_line(line: &str) -> Result<TelemetryFrame, TelemetryParseError> {
    let mut frame = TelemetryFrame::default();
    for token in line.split_whitespace() {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        match key {
            "VEL" => frame.speed = Some(parse_value(value, "VEL")?),
            "RPM" => frame.rpm = Some(parse_value(value, "RPM")?),
            _ => {}
        }
    }
    Ok(frame)
}

/// Decode a raw line buffer, rejecting non-UTF-8 and truncated input.
/// A buffer cut at capacity may end mid-token, where the cut prefix of
/// an integer would decode as a wrong but well-formed value.
pub fn decode_line_bytes(line: &LineBytes) -> Result<TelemetryFrame, TelemetryParseError> {
    if line.is_truncated() {
        return Err(TelemetryParseError::LineTooLong);
    }
    let text = core::str::from_utf8(line.as_slice()).map_err(|_| TelemetryParseError::NotUtf8)?;
    decode_line(text)
}

fn parse_value(value: &str, key: &'static str) -> Result<i32, TelemetryParseError> {
    value
        .parse::<i32>()
        .map_err(|_| TelemetryParseError::MalformedInteger { key })
}
