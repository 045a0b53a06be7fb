//! Per-gear speed/RPM ceilings and gear arithmetic.
//!
//! The table is the single authoritative copy of the ceiling values. It is
//! immutable process-wide state: built into the binary, never mutated,
//! safely shared without locking.
use crate::core::GearId;

//==================================================================================LIMITS

/// Speed/RPM ceiling pair for one gear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GearLimits {
    pub max_speed: u16,
    pub max_rpm: u16,
}

impl GearLimits {
    /// Ceilings for the given gear.
    ///
    /// Total over the closed [`GearId`] set, so the lookup cannot fail:
    /// unknown gear identifiers are rejected at the parsing boundary by
    /// [`GearId::try_from_char`].
    pub const fn of(gear: GearId) -> Self {
        match gear {
            GearId::Neutral => Self::new(0, 0),
            GearId::Reverse => Self::new(40, 2000),
            GearId::First => Self::new(100, 2500),
            GearId::Second => Self::new(125, 3000),
            GearId::Third => Self::new(200, 3500),
            GearId::Fourth => Self::new(225, 4000),
            GearId::Fifth => Self::new(300, 4500),
            GearId::Sixth => Self::new(325, 5000),
            GearId::Seventh => Self::new(400, 6000),
        }
    }

    const fn new(max_speed: u16, max_rpm: u16) -> Self {
        Self { max_speed, max_rpm }
    }

    /// Clamp a raw reading into `[0, ceiling]` for this gear.
    pub fn clamp_speed(&self, value: i32) -> u16 {
        value.clamp(0, self.max_speed as i32) as u16
    }

    /// Clamp a raw RPM reading into `[0, ceiling]` for this gear.
    pub fn clamp_rpm(&self, value: i32) -> u16 {
        value.clamp(0, self.max_rpm as i32) as u16
    }
}

//==================================================================================CYCLING

/// Next gear in the cycle `1 → 2 → … → 7 → 1`.
///
/// Non-numeric gears (N, R) are treated as gear 1 and therefore land on
/// gear 2. That is the historical controller behavior, kept deterministic
/// on purpose; see the decision log.
pub const fn next_numeric(gear: GearId) -> GearId {
    let current = match gear.digit() {
        Some(d) => d,
        None => 1,
    };
    let next = if current < 7 { current + 1 } else { 1 };
    match next {
        1 => GearId::First,
        2 => GearId::Second,
        3 => GearId::Third,
        4 => GearId::Fourth,
        5 => GearId::Fifth,
        6 => GearId::Sixth,
        _ => GearId::Seventh,
    }
}
