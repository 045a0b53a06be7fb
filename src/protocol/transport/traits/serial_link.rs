//! Minimal abstraction for the byte-stream link to the vehicle. Allows
//! the library to plug into various implementations (OS serial port,
//! Bluetooth RFCOMM socket, embedded UART, in-memory test double).
use crate::core::LineBytes;
use futures_util::Future;

/// Contract to send command bytes and poll telemetry lines.
///
/// Failures carry the implementor's own error type; the session treats
/// every link error as non-fatal (logged, state keeps its last
/// known-good values, no reconnect is attempted).
pub trait SerialLink {
    type Error: core::fmt::Debug;

    /// Transmit raw bytes to the vehicle. Asynchronous to accommodate
    /// non-blocking drivers; delivery is at-most-once.
    fn send<'a>(
        &'a mut self,
        bytes: &'a [u8],
    ) -> impl Future<Output = Result<(), Self::Error>> + 'a;

    /// Fetch the next complete telemetry line, if one is buffered.
    ///
    /// Must never block: a disconnected or silent peer simply yields
    /// `Ok(None)` forever and the session keeps ticking.
    fn poll_line(&mut self) -> Result<Option<LineBytes>, Self::Error>;
}
