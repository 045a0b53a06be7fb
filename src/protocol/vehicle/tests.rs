//! Unit tests for the vehicle state machine: clamping, decay, gears,
//! signals, and per-mode intent handling.
use super::*;

fn sim_state() -> VehicleState {
    VehicleState::new(&SessionConfig::default(), DriveMode::Simulation)
}

fn linked_state() -> VehicleState {
    VehicleState::new(&SessionConfig::default(), DriveMode::Linked)
}

//==================================================================================Construction

#[test]
/// Sessions open in gear 1 with zeroed gauges by default.
fn default_construction() {
    let state = sim_state();
    assert_eq!(state.gear(), GearId::First);
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
    assert_eq!(state.signal(Side::Left), SignalState::Off);
    assert_eq!(state.signal(Side::Right), SignalState::Off);
}

#[test]
/// A configured initial speed is clamped to the initial gear's ceiling.
fn initial_speed_is_clamped() {
    let config = SessionConfig {
        initial_gear: GearId::First,
        speed_initial: 999,
    };
    let state = VehicleState::new(&config, DriveMode::Simulation);
    assert_eq!(state.speed(), 100);
}

//==================================================================================Simulated movement

#[test]
/// Acceleration steps the gauges and saturates at the gear ceiling.
fn simulated_acceleration_clamps_to_ceiling() {
    let mut state = sim_state();
    for _ in 0..30 {
        assert_eq!(state.apply_intent(Intent::Accelerate), None);
    }
    // Gear 1 ceiling is (100, 2500); 30 steps would reach (300, 3000).
    assert_eq!(state.speed(), 100);
    assert_eq!(state.rpm(), 2500);
}

#[test]
/// Deceleration steps down and floors at zero.
fn simulated_deceleration_floors_at_zero() {
    let mut state = sim_state();
    state.apply_intent(Intent::Accelerate);
    state.apply_intent(Intent::Decelerate);
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
    state.apply_intent(Intent::Decelerate);
    assert_eq!(state.speed(), 0);
}

#[test]
/// Steering intents never touch the gauges.
fn steering_leaves_gauges_alone() {
    let mut state = sim_state();
    state.apply_intent(Intent::Accelerate);
    let (speed, rpm) = (state.speed(), state.rpm());
    assert_eq!(state.apply_intent(Intent::SteerLeft), None);
    assert_eq!(state.apply_intent(Intent::SteerRight), None);
    assert_eq!((state.speed(), state.rpm()), (speed, rpm));
}

#[test]
/// Stop zeroes everything and drops to neutral, in simulation mode
/// without any transmission.
fn stop_resets_to_neutral() {
    let mut state = sim_state();
    state.apply_intent(Intent::ShiftTo(GearId::Fourth));
    assert_eq!(state.apply_intent(Intent::Stop), None);
    assert_eq!(state.gear(), GearId::Neutral);
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
}

//==================================================================================Gear shifts

#[test]
/// Shifting is an instantaneous jump to the new gear's ceilings.
fn shift_sets_instantaneous_max() {
    let mut state = sim_state();
    for gear in [GearId::Third, GearId::Seventh, GearId::Reverse] {
        state.apply_intent(Intent::ShiftTo(gear));
        let limits = GearLimits::of(gear);
        assert_eq!(state.gear(), gear);
        assert_eq!(state.speed(), limits.max_speed);
        assert_eq!(state.rpm(), limits.max_rpm);
    }
}

#[test]
/// Shifting to neutral zeroes the gauges.
fn shift_to_neutral_zeroes() {
    let mut state = sim_state();
    state.apply_intent(Intent::ShiftTo(GearId::Fifth));
    state.apply_intent(Intent::ShiftTo(GearId::Neutral));
    assert_eq!(state.gear(), GearId::Neutral);
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
}

#[test]
/// Seven cycles from gear 1 return to gear 1.
fn cycling_is_closed() {
    let mut state = sim_state();
    for _ in 0..7 {
        state.apply_intent(Intent::CycleGear);
    }
    assert_eq!(state.gear(), GearId::First);
}

#[test]
/// Cycling from neutral behaves as if gear 1 were engaged and lands on 2.
fn cycle_from_neutral_lands_on_second() {
    let mut state = sim_state();
    state.apply_intent(Intent::Stop);
    assert_eq!(state.gear(), GearId::Neutral);
    state.apply_intent(Intent::CycleGear);
    assert_eq!(state.gear(), GearId::Second);
}

//==================================================================================Linked mode

#[test]
/// Linked movement intents transmit and leave the local gauges alone.
fn linked_movement_transmits_without_local_change() {
    let mut state = linked_state();
    assert_eq!(
        state.apply_intent(Intent::Accelerate),
        Some(WireCommand::Forward)
    );
    assert_eq!(state.speed(), 0);
    assert_eq!(
        state.apply_intent(Intent::SteerLeft),
        Some(WireCommand::SteerLeft)
    );
    assert_eq!(
        state.apply_intent(Intent::Decelerate),
        Some(WireCommand::Reverse)
    );
}

#[test]
/// Linked stop transmits the halt byte and resets the local mirror.
fn linked_stop_transmits_and_resets() {
    let mut state = linked_state();
    state.apply_intent(Intent::ShiftTo(GearId::Second));
    assert_eq!(state.apply_intent(Intent::Stop), Some(WireCommand::Halt));
    assert_eq!(state.gear(), GearId::Neutral);
    assert_eq!(state.speed(), 0);
}

#[test]
/// Forward gear shifts transmit their digit; N and R stay local.
fn linked_gear_selection_asymmetry() {
    let mut state = linked_state();
    assert_eq!(
        state.apply_intent(Intent::ShiftTo(GearId::Third)),
        Some(WireCommand::SelectGear(GearId::Third))
    );
    assert_eq!(state.apply_intent(Intent::ShiftTo(GearId::Reverse)), None);
    assert_eq!(state.gear(), GearId::Reverse);
    assert_eq!(state.apply_intent(Intent::ShiftTo(GearId::Neutral)), None);
    assert_eq!(state.gear(), GearId::Neutral);
}

#[test]
/// Cycling in linked mode transmits the digit of the gear it lands on.
fn linked_cycle_transmits_next_digit() {
    let mut state = linked_state();
    assert_eq!(
        state.apply_intent(Intent::CycleGear),
        Some(WireCommand::SelectGear(GearId::Second))
    );
}

//==================================================================================Telemetry

#[test]
/// Telemetry is clamped to the current gear's ceiling on application.
fn telemetry_clamps_to_current_gear() {
    let mut state = linked_state();
    state.apply_telemetry(TelemetryFrame {
        speed: Some(999),
        rpm: Some(9999),
    });
    // Gear 1 ceiling is (100, 2500).
    assert_eq!(state.speed(), 100);
    assert_eq!(state.rpm(), 2500);
}

#[test]
/// Absent fields leave the matching gauge untouched.
fn partial_telemetry_keeps_other_field() {
    let mut state = linked_state();
    state.apply_telemetry(TelemetryFrame {
        speed: Some(42),
        rpm: Some(1200),
    });
    state.apply_telemetry(TelemetryFrame {
        speed: None,
        rpm: Some(800),
    });
    assert_eq!(state.speed(), 42);
    assert_eq!(state.rpm(), 800);
}

#[test]
/// Negative readings clamp to the zero floor.
fn negative_telemetry_clamps_to_zero() {
    let mut state = linked_state();
    state.apply_telemetry(TelemetryFrame {
        speed: Some(-5),
        rpm: Some(-100),
    });
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
}

//==================================================================================Decay

#[test]
/// Ten decay calls from speed 20 reach the floor and force neutral.
fn decay_reaches_floor_and_resets_gear() {
    let mut state = sim_state();
    state.apply_telemetry(TelemetryFrame {
        speed: Some(20),
        rpm: Some(1500),
    });
    for _ in 0..9 {
        assert!(state.decay());
        assert_eq!(state.gear(), GearId::First);
    }
    assert!(state.decay());
    assert_eq!(state.speed(), 0);
    assert_eq!(state.rpm(), 0);
    assert_eq!(state.gear(), GearId::Neutral);
    assert_eq!(state.limits(), GearLimits::of(GearId::Neutral));
}

#[test]
/// Decay is idempotent at the floor.
fn decay_is_idempotent_at_floor() {
    let mut state = sim_state();
    state.apply_intent(Intent::Stop);
    for _ in 0..5 {
        assert!(!state.decay());
        assert_eq!(state.gear(), GearId::Neutral);
        assert_eq!((state.speed(), state.rpm()), (0, 0));
    }
}

#[test]
/// When speed hits zero, the rpm gauge is clamped to neutral's ceiling
/// in the same call instead of lingering above it.
fn decay_clamps_rpm_with_gear_reset() {
    let mut state = sim_state();
    state.apply_telemetry(TelemetryFrame {
        speed: Some(2),
        rpm: Some(2500),
    });
    assert!(state.decay());
    assert_eq!(state.gear(), GearId::Neutral);
    assert_eq!(state.rpm(), 0);
}

//==================================================================================Signals

#[test]
/// Enable arms the blinker hidden; ticks alternate; disable goes
/// straight to off.
fn signal_lifecycle() {
    let mut state = sim_state();
    state.set_signal(Side::Left, true);
    assert_eq!(state.signal(Side::Left), SignalState::BlinkHidden);
    assert_eq!(state.toggle_blink(Side::Left), SignalState::BlinkVisible);
    assert_eq!(state.toggle_blink(Side::Left), SignalState::BlinkHidden);
    state.set_signal(Side::Left, false);
    assert_eq!(state.signal(Side::Left), SignalState::Off);
}

#[test]
/// Blink ticks have no effect on a disabled signal.
fn blink_ignores_disabled_signal() {
    let mut state = sim_state();
    assert_eq!(state.toggle_blink(Side::Right), SignalState::Off);
    assert_eq!(state.signal(Side::Right), SignalState::Off);
}

#[test]
/// A solid indicator stays lit through blink ticks.
fn solid_signal_does_not_blink() {
    let mut state = sim_state();
    state.set_signal_solid(Side::Right);
    assert_eq!(state.signal(Side::Right), SignalState::OnSolid);
    assert_eq!(state.toggle_blink(Side::Right), SignalState::OnSolid);
    assert!(state.signal(Side::Right).is_lit());
}

#[test]
/// Toggle intents flip each side independently and transmit nothing.
fn toggle_intents_flip_sides_independently() {
    let mut state = sim_state();
    assert_eq!(state.apply_intent(Intent::ToggleLeftSignal), None);
    assert!(state.signal(Side::Left).is_enabled());
    assert_eq!(state.signal(Side::Right), SignalState::Off);
    assert_eq!(state.apply_intent(Intent::ToggleRightSignal), None);
    assert!(state.signal(Side::Right).is_enabled());
    state.apply_intent(Intent::ToggleLeftSignal);
    assert_eq!(state.signal(Side::Left), SignalState::Off);
    assert!(state.signal(Side::Right).is_enabled());
}
