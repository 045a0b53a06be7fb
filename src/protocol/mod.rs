//! Control protocol implementation: gear ceilings, command codec,
//! vehicle state machine, session runner, and transport abstractions.
pub mod codec;
pub mod gears;
pub mod session;
pub mod transport;
pub mod vehicle;
