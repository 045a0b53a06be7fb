//! Data contract shared by the command codec, the vehicle state machine,
//! and the session runner. Everything here is plain value types: no I/O,
//! no allocation.
use crate::error::GearIdError;

// Maximum byte length accepted for one inbound telemetry line.
pub const MAX_TELEMETRY_LINE: usize = 64;

//==================================================================================GEARS

/// Gear selector: one ceiling regime bounding achievable speed/RPM.
///
/// The set is closed; anything read from the outside world goes through
/// [`GearId::try_from_char`] so the rest of the crate never sees an
/// unknown gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GearId {
    Neutral,
    Reverse,
    First,
    Second,
    Third,
    Fourth,
    Fifth,
    Sixth,
    Seventh,
}

impl GearId {
    /// All gears, in table order.
    pub const ALL: [GearId; 9] = [
        GearId::Neutral,
        GearId::Reverse,
        GearId::First,
        GearId::Second,
        GearId::Third,
        GearId::Fourth,
        GearId::Fifth,
        GearId::Sixth,
        GearId::Seventh,
    ];

    /// Parse a gear from its ASCII identifier (`N`, `R`, `1`..`7`).
    pub fn try_from_char(c: char) -> Result<Self, GearIdError> {
        match c {
            'N' => Ok(GearId::Neutral),
            'R' => Ok(GearId::Reverse),
            '1' => Ok(GearId::First),
            '2' => Ok(GearId::Second),
            '3' => Ok(GearId::Third),
            '4' => Ok(GearId::Fourth),
            '5' => Ok(GearId::Fifth),
            '6' => Ok(GearId::Sixth),
            '7' => Ok(GearId::Seventh),
            other => Err(GearIdError::UnknownGear(other)),
        }
    }

    /// ASCII identifier for the gear, as used on the wire and in settings.
    pub const fn as_char(self) -> char {
        match self {
            GearId::Neutral => 'N',
            GearId::Reverse => 'R',
            GearId::First => '1',
            GearId::Second => '2',
            GearId::Third => '3',
            GearId::Fourth => '4',
            GearId::Fifth => '5',
            GearId::Sixth => '6',
            GearId::Seventh => '7',
        }
    }

    /// Numeric position for the forward gears (`1`..`7`), `None` for N/R.
    pub const fn digit(self) -> Option<u8> {
        match self {
            GearId::Neutral | GearId::Reverse => None,
            GearId::First => Some(1),
            GearId::Second => Some(2),
            GearId::Third => Some(3),
            GearId::Fourth => Some(4),
            GearId::Fifth => Some(5),
            GearId::Sixth => Some(6),
            GearId::Seventh => Some(7),
        }
    }

    /// Whether the gear is one of the forward gears `1`..`7`.
    pub const fn is_numeric(self) -> bool {
        self.digit().is_some()
    }
}

//==================================================================================SIGNALS

/// Left or right side of the vehicle (turn signals, steering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// State of one turn-signal indicator.
///
/// `Off` is both the initial state and the only state reachable by an
/// explicit disable. While enabled, the blink tick alternates the two
/// blinking phases; `OnSolid` holds the lamp lit without blinking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SignalState {
    Off,
    OnSolid,
    BlinkVisible,
    BlinkHidden,
}

impl SignalState {
    /// Whether the signal participates in blink ticks.
    pub const fn is_enabled(self) -> bool {
        !matches!(self, SignalState::Off)
    }

    /// Whether the lamp should currently be drawn lit.
    pub const fn is_lit(self) -> bool {
        matches!(self, SignalState::OnSolid | SignalState::BlinkVisible)
    }
}

//==================================================================================INTENTS

/// Whether the session talks to a physical vehicle or simulates one.
///
/// In `Simulation` the movement intents drive the local gauges directly
/// and nothing is ever transmitted. In `Linked` the gauges are owned by
/// inbound telemetry and movement intents only produce wire commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    Simulation,
    Linked,
}

/// A discrete driver action, independent of the input device it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Intent {
    /// Speed up (held movement key).
    Accelerate,
    /// Slow down / back up (held movement key).
    Decelerate,
    /// Explicit stop or brake: zeroes the gauges and drops to neutral.
    Stop,
    /// Steer left while held. Never touches the local gauges.
    SteerLeft,
    /// Steer right while held. Never touches the local gauges.
    SteerRight,
    /// Select a specific gear.
    ShiftTo(GearId),
    /// Advance to the next forward gear, wrapping 7 back to 1.
    CycleGear,
    ToggleLeftSignal,
    ToggleRightSignal,
}

//==================================================================================TELEMETRY

/// One decoded inbound telemetry report.
///
/// Fields absent from the line stay `None` and leave the matching part of
/// the vehicle state untouched. Values are clamped when applied, never
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TelemetryFrame {
    pub speed: Option<i32>,
    pub rpm: Option<i32>,
}

impl TelemetryFrame {
    /// Whether the frame carries no recognized field at all.
    pub const fn is_empty(&self) -> bool {
        self.speed.is_none() && self.rpm.is_none()
    }
}

/// Fixed-capacity buffer holding one raw telemetry line, without its
/// terminator. Input longer than [`MAX_TELEMETRY_LINE`] is cut there and
/// flagged; the codec rejects flagged buffers instead of decoding a cut
/// token as a shorter valid value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBytes {
    pub len: usize,
    pub truncated: bool,
    pub data: [u8; MAX_TELEMETRY_LINE],
}

impl Default for LineBytes {
    fn default() -> Self {
        Self::new()
    }
}

impl LineBytes {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            len: 0,
            truncated: false,
            data: [0; MAX_TELEMETRY_LINE],
        }
    }

    /// Number of valid bytes stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the buffer is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Copy bytes into the buffer and update `len`. Oversized input is
    /// cut at capacity and the buffer is flagged as truncated.
    #[inline]
    pub fn copy_from_slice(&mut self, slice: &[u8]) {
        let clamped = slice.len().min(MAX_TELEMETRY_LINE);
        self.data[..clamped].copy_from_slice(&slice[..clamped]);
        self.len = clamped;
        self.truncated = slice.len() > MAX_TELEMETRY_LINE;
    }

    /// Build a buffer directly from a byte slice.
    pub fn from_slice(slice: &[u8]) -> Self {
        let mut line = Self::new();
        line.copy_from_slice(slice);
        line
    }

    /// Whether the stored line was cut because the input overran the
    /// buffer capacity.
    #[inline]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Immutable view over the populated bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.len]
    }
}
