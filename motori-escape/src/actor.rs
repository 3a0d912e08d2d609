use crate::DeviceError;

/// Consumer of the effects the [`Interceptor`](crate::Interceptor) cannot
/// carry out itself.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about. Callbacks run synchronously from the receive path and
/// must not block.
pub trait Actor {
    /// Bytes to transmit to the host (handshake characters and replies).
    fn send(&mut self, _: &[u8]) {}

    /// The cancel byte was received. `incomplete` is set when it cut a
    /// device-control instruction short.
    fn cancel(&mut self, _incomplete: bool) {}

    /// `ESC . K`: discard buffered graphics input.
    fn abort_graphics(&mut self) {}

    fn device_error(&mut self, _: DeviceError) {}
}
