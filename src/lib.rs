//! `trundle-rc` library: state machine and wire protocol required to
//! remote-control a small wheeled vehicle over a serial/Bluetooth byte
//! stream in a `no_std` environment. The crate exposes the shared data
//! types, the gear/speed/RPM model, the command codec, the tick-driven
//! session runner, and the transport traits the integrator implements.
#![no_std]
//==================================================================================
/// Session configuration and key-binding translation.
pub mod config;
/// Core data types shared by the codec, the state machine, and the session.
pub mod core;
/// Domain errors (gear parsing, telemetry decoding).
pub mod error;
/// Control protocol implementation: gear table, command codec, vehicle
/// state machine, session runner, and transport abstractions.
pub mod protocol;
//==================================================================================
