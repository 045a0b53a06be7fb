//! [`SerialLink`] extension providing a typed API to transmit wire
//! commands: every command is exactly one ASCII byte on the wire.
use crate::protocol::codec::WireCommand;
use crate::protocol::transport::traits::serial_link::SerialLink;

/// Trait extending `SerialLink` with an ergonomic command-sending helper.
pub trait CommandSender: SerialLink
where
    <Self as SerialLink>::Error: core::fmt::Debug,
{
    /// Encode and transmit one wire command.
    ///
    /// # Errors
    ///
    /// Propagates the link's own error; callers decide whether to log and
    /// continue (the session runner does).
    fn send_command<'a>(
        &'a mut self,
        command: WireCommand,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> + 'a;
}

impl<L: SerialLink> CommandSender for L
where
    L::Error: core::fmt::Debug,
{
    fn send_command<'a>(
        &'a mut self,
        command: WireCommand,
    ) -> impl core::future::Future<Output = Result<(), Self::Error>> + 'a {
        async move {
            let byte = [command.encode()];
            self.send(&byte).await
        }
    }
}
