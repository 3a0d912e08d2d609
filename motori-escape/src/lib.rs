//! Receive side of the plotter serial link.
//!
//! The [`Interceptor`] sees every byte before it reaches the receive buffer.
//! It recognises the cancel byte, answers enquiries, throttles the sender
//! with XON/XOFF and executes `ESC .` device-control instructions. Effects
//! that need the outside world are reported to an [`Actor`].

mod actor;
mod control;
mod device;
mod error;
mod flow;
mod status;

pub use actor::Actor;
pub use control::ControlCode;
pub use device::{
    Device, DeviceCommand, DeviceControl, Instruction, MAX_DEVICE_PARAMS,
};
pub use error::DeviceError;
pub use flow::{BufferLevel, FlowState, Handshake, Interceptor, OutputMode};
pub use status::ExtendedStatus;
