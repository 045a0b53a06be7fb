//! Abstraction traits used by the session runner (serial link, timer,
//! and command sender).
pub mod command_sender;
pub mod serial_link;
pub mod tick_timer;
