//! Asynchronous timer abstraction providing the timing primitive the
//! session runner needs to drive decay and blink ticks.

/// Timer trait abstraction; must remain thread-safe when applicable.
pub trait TickTimer {
    /// Asynchronously wait for `millis` milliseconds.
    fn delay_ms<'a>(
        &'a mut self,
        millis: u32,
    ) -> impl core::future::Future<Output = ()> + 'a;
}
