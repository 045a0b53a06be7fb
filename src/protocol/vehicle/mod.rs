//! Vehicle state machine: gear, gauges, and turn signals.
//!
//! One `VehicleState` exists per open session and is exclusively owned by
//! it; every mutation path (intents, telemetry, decay, blink) runs through
//! the owner, so the clamping invariant — speed/rpm never observable above
//! the current gear's ceiling — holds at all times.
use crate::config::SessionConfig;
use crate::core::{DriveMode, GearId, Intent, Side, SignalState, TelemetryFrame};
use crate::protocol::codec::{self, WireCommand};
use crate::protocol::gears::{next_numeric, GearLimits};

//==================================================================================Constants

/// Speed gained per accelerate intent in simulation mode.
pub const ACCELERATION_STEP: u16 = 10;
/// RPM gained per accelerate intent in simulation mode.
pub const ACCELERATION_RPM_STEP: u16 = ACCELERATION_STEP * 10;
/// Speed lost per decay tick.
pub const DECAY_SPEED_STEP: u16 = 2;
/// RPM lost per decay tick.
pub const DECAY_RPM_STEP: u16 = 150;

//==================================================================================Snapshot

/// Read-only copy of the dashboard state handed to the presentation
/// layer. Renderers only ever see these; they never hold the state itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Snapshot {
    pub gear: GearId,
    pub speed: u16,
    pub rpm: u16,
    pub limits: GearLimits,
    pub left_signal: SignalState,
    pub right_signal: SignalState,
}

//==================================================================================VehicleState

/// Dashboard model for one control session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleState {
    gear: GearId,
    speed: u16,
    rpm: u16,
    left_signal: SignalState,
    right_signal: SignalState,
    mode: DriveMode,
}

impl VehicleState {
    /// Build the session state from the provided configuration.
    ///
    /// The configured initial speed is clamped to the initial gear's
    /// ceiling so the state starts inside its invariant.
    pub fn new(config: &SessionConfig, mode: DriveMode) -> Self {
        let limits = GearLimits::of(config.initial_gear);
        Self {
            gear: config.initial_gear,
            speed: config.speed_initial.min(limits.max_speed),
            rpm: 0,
            left_signal: SignalState::Off,
            right_signal: SignalState::Off,
            mode,
        }
    }

    pub fn gear(&self) -> GearId {
        self.gear
    }

    pub fn speed(&self) -> u16 {
        self.speed
    }

    pub fn rpm(&self) -> u16 {
        self.rpm
    }

    pub fn mode(&self) -> DriveMode {
        self.mode
    }

    /// Ceilings for the currently engaged gear.
    pub fn limits(&self) -> GearLimits {
        GearLimits::of(self.gear)
    }

    pub fn signal(&self, side: Side) -> SignalState {
        match side {
            Side::Left => self.left_signal,
            Side::Right => self.right_signal,
        }
    }

    /// Read-only copy for the presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            gear: self.gear,
            speed: self.speed,
            rpm: self.rpm,
            limits: self.limits(),
            left_signal: self.left_signal,
            right_signal: self.right_signal,
        }
    }

    //==================================================================================Intents

    /// Apply one driver intent and return the wire command to transmit,
    /// if the intent reaches the wire in the current mode.
    ///
    /// Simulation mode: movement intents drive the gauges locally and
    /// nothing is transmitted. Linked mode: the gauges belong to inbound
    /// telemetry, movement intents only produce commands — except `Stop`,
    /// which also resets the local mirror in both modes.
    pub fn apply_intent(&mut self, intent: Intent) -> Option<WireCommand> {
        match intent {
            Intent::Accelerate | Intent::Decelerate | Intent::SteerLeft | Intent::SteerRight => {
                if self.mode == DriveMode::Simulation {
                    self.apply_simulated_movement(intent);
                    None
                } else {
                    codec::encode_movement(intent, self.mode)
                }
            }
            Intent::Stop => {
                self.reset_to_neutral();
                codec::encode_movement(Intent::Stop, self.mode)
            }
            Intent::ShiftTo(gear) => {
                self.shift_to(gear);
                match self.mode {
                    DriveMode::Simulation => None,
                    // N and R stay local: the protocol defines no byte for them.
                    DriveMode::Linked => WireCommand::for_gear(gear),
                }
            }
            Intent::CycleGear => {
                let next = next_numeric(self.gear);
                self.shift_to(next);
                match self.mode {
                    DriveMode::Simulation => None,
                    DriveMode::Linked => WireCommand::for_gear(next),
                }
            }
            Intent::ToggleLeftSignal => {
                self.set_signal(Side::Left, !self.left_signal.is_enabled());
                None
            }
            Intent::ToggleRightSignal => {
                self.set_signal(Side::Right, !self.right_signal.is_enabled());
                None
            }
        }
    }

    fn apply_simulated_movement(&mut self, intent: Intent) {
        let limits = self.limits();
        match intent {
            Intent::Accelerate => {
                self.speed = (self.speed + ACCELERATION_STEP).min(limits.max_speed);
                self.rpm = (self.rpm + ACCELERATION_RPM_STEP).min(limits.max_rpm);
            }
            Intent::Decelerate => {
                self.speed = self.speed.saturating_sub(ACCELERATION_STEP);
                self.rpm = self.rpm.saturating_sub(ACCELERATION_RPM_STEP);
            }
            // Steering never touches the gauges.
            _ => {}
        }
    }

    /// Engage a gear, applying the instantaneous-max rule: the gauges
    /// jump straight to the new gear's ceilings (neutral zeroes them).
    fn shift_to(&mut self, gear: GearId) {
        self.gear = gear;
        let limits = self.limits();
        self.speed = limits.max_speed;
        self.rpm = limits.max_rpm;
        #[cfg(feature = "defmt")]
        defmt::info!(
            "Gear engaged: {} (speed {} rpm {})",
            gear.as_char(),
            self.speed,
            self.rpm
        );
    }

    /// Drop to neutral with both gauges zeroed (explicit stop, or decay
    /// reaching the floor).
    fn reset_to_neutral(&mut self) {
        self.gear = GearId::Neutral;
        self.speed = 0;
        self.rpm = 0;
        #[cfg(feature = "defmt")]
        defmt::info!("Vehicle stopped, back to neutral");
    }

    //==================================================================================Telemetry

    /// Overwrite the gauges with a measured frame.
    ///
    /// Each present field is clamped to `[0, ceiling]` of the *current*
    /// gear before being stored; absent fields are left unchanged.
    pub fn apply_telemetry(&mut self, frame: TelemetryFrame) {
        let limits = self.limits();
        if let Some(speed) = frame.speed {
            self.speed = limits.clamp_speed(speed);
        }
        if let Some(rpm) = frame.rpm {
            self.rpm = limits.clamp_rpm(rpm);
        }
    }

    //==================================================================================Decay

    /// One inertia tick: speed −2, rpm −150, floored at 0.
    ///
    /// When speed reaches 0 the gear is forced to neutral and both gauges
    /// are clamped to neutral's (0, 0) ceilings in the same call, keeping
    /// the invariant intact. Idempotent at the floor: once everything is
    /// at 0 with gear N, further calls report no change.
    pub fn decay(&mut self) -> bool {
        let mut changed = false;
        if self.speed > 0 {
            self.speed = self.speed.saturating_sub(DECAY_SPEED_STEP);
            changed = true;
        }
        if self.rpm > 0 {
            self.rpm = self.rpm.saturating_sub(DECAY_RPM_STEP);
            changed = true;
        }
        if changed && self.speed == 0 {
            self.reset_to_neutral();
        }
        changed
    }

    //==================================================================================Signals

    /// Enable or disable one turn signal.
    ///
    /// Enabling arms the blinker in the hidden phase; the first blink tick
    /// makes it visible. Disabling goes straight to `Off`, never through a
    /// blinking phase.
    pub fn set_signal(&mut self, side: Side, enabled: bool) {
        let state = if enabled {
            SignalState::BlinkHidden
        } else {
            SignalState::Off
        };
        match side {
            Side::Left => self.left_signal = state,
            Side::Right => self.right_signal = state,
        }
    }

    /// Hold one indicator lit without blinking.
    pub fn set_signal_solid(&mut self, side: Side) {
        match side {
            Side::Left => self.left_signal = SignalState::OnSolid,
            Side::Right => self.right_signal = SignalState::OnSolid,
        }
    }

    /// One blink tick for the given side: flips the visible/hidden phase.
    /// No effect on a disabled or solid signal. Returns the new state.
    pub fn toggle_blink(&mut self, side: Side) -> SignalState {
        let slot = match side {
            Side::Left => &mut self.left_signal,
            Side::Right => &mut self.right_signal,
        };
        *slot = match *slot {
            SignalState::BlinkVisible => SignalState::BlinkHidden,
            SignalState::BlinkHidden => SignalState::BlinkVisible,
            other => other,
        };
        *slot
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
