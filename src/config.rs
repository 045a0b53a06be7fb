//! Session configuration and key-binding translation.
//!
//! The settings provider (host UI, file, whatever) owns persistence; this
//! crate only consumes the resulting values. Both types optionally derive
//! serde so a host settings file can deserialize straight into them.
use crate::core::{GearId, Intent};

//==================================================================================SESSION_CONFIG

/// Initial dashboard values supplied by the settings provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionConfig {
    /// Gear engaged when the session opens.
    pub initial_gear: GearId,
    /// Speed shown before any input or telemetry arrives. Clamped to the
    /// initial gear's ceiling when the state machine is built.
    pub speed_initial: u16,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_gear: GearId::First,
            speed_initial: 0,
        }
    }
}

//==================================================================================KEY_MAP

/// Mapping from configured key characters to driver intents.
///
/// Defaults mirror the stock bindings: forward `a`, backward `r`, left
/// `i`, right `d`, stop `p`, auto-brake `b`, gear cycle `c`, signals
/// `q`/`e`. Digits `1`..`7` and `N`/`R` always select the matching gear
/// unless shadowed by an explicit binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyMap {
    pub forward: char,
    pub backward: char,
    pub left: char,
    pub right: char,
    pub stop: char,
    pub auto_brake: char,
    pub cycle_gear: char,
    pub left_signal: char,
    pub right_signal: char,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            forward: 'a',
            backward: 'r',
            left: 'i',
            right: 'd',
            stop: 'p',
            auto_brake: 'b',
            cycle_gear: 'c',
            left_signal: 'q',
            right_signal: 'e',
        }
    }
}

impl KeyMap {
    /// Translate a key-down event into an intent.
    ///
    /// Explicit bindings win over the implicit gear characters, so a user
    /// who binds forward to `1` keeps driving instead of shifting.
    pub fn intent_for_press(&self, key: char) -> Option<Intent> {
        if key == self.forward {
            Some(Intent::Accelerate)
        } else if key == self.backward {
            Some(Intent::Decelerate)
        } else if key == self.left {
            Some(Intent::SteerLeft)
        } else if key == self.right {
            Some(Intent::SteerRight)
        } else if key == self.stop || key == self.auto_brake {
            Some(Intent::Stop)
        } else if key == self.cycle_gear {
            Some(Intent::CycleGear)
        } else if key == self.left_signal {
            Some(Intent::ToggleLeftSignal)
        } else if key == self.right_signal {
            Some(Intent::ToggleRightSignal)
        } else {
            GearId::try_from_char(key).ok().map(Intent::ShiftTo)
        }
    }

    /// Translate a key-up event into an intent.
    ///
    /// Releasing a held movement key means "no key held": the vehicle
    /// goes back to neutral drive, which is an explicit [`Intent::Stop`].
    /// Every other release is ignored.
    pub fn intent_for_release(&self, key: char) -> Option<Intent> {
        if key == self.forward
            || key == self.backward
            || key == self.left
            || key == self.right
            || key == self.stop
        {
            Some(Intent::Stop)
        } else {
            None
        }
    }

    /// Whether the key is bound to a held movement action.
    pub fn is_movement_key(&self, key: char) -> bool {
        key == self.forward
            || key == self.backward
            || key == self.left
            || key == self.right
            || key == self.stop
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
