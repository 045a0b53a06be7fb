//! Transport layer: the abstractions the integrator implements to plug a
//! physical serial/Bluetooth link and a timing source into the session.
//!
//! The core never opens, scans, or reconnects ports; it borrows an
//! already-open link and returns it when the session closes.
pub mod traits;
