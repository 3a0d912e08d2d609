//! Collaborators the plotter drives.
//!
//! A host supplies motion, the serial stream and optional accessories. The
//! three traits are separate so a board can be assembled from independent
//! pieces; anything implementing all of them is a [`Host`].

use motori_geom::Point;

/// Motion controller state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    #[default]
    Idle,
    /// Executing queued motion.
    Busy,
    /// Being jogged by the operator.
    Jog,
    Alarm,
}

pub trait Motion {
    /// Queue a straight move to `target`, in millimetres from the machine
    /// origin. May block while the motion queue is full. Returns `false`
    /// when the controller refused the move.
    fn move_to(&mut self, target: Point, rapid: bool, feed_rate: f32) -> bool;

    /// Block until queued motion has finished.
    fn synchronize(&mut self);

    /// Machine position in millimetres.
    fn current_position(&self) -> Point;

    fn set_pen(&mut self, down: bool);

    /// Start a homing cycle. Returns `false` when it could not be started.
    fn home(&mut self) -> bool;

    fn state(&self) -> HostState;
}

/// Serial stream. Bytes claimed by the interceptor never reach the receive
/// buffer.
pub trait Stream {
    fn read(&mut self) -> Option<u8>;

    fn write(&mut self, bytes: &[u8]);

    fn rx_free(&self) -> usize;

    fn rx_count(&self) -> usize;

    fn rx_capacity(&self) -> usize;

    fn flush_rx(&mut self);
}

/// Optional hardware. Every method defaults to doing nothing.
pub trait Accessory {
    /// Pen carousel or tool change.
    fn select_pen(&mut self, _pen: u8) {}

    fn pen_led(&mut self, _down: bool) {}

    /// An error selected by `IM` is pending.
    fn set_alert(&mut self, _on: bool) {}

    /// Offline input is left in the receive buffer.
    fn is_online(&self) -> bool {
        true
    }
}

pub trait Host: Motion + Stream + Accessory {}

impl<T: Motion + Stream + Accessory> Host for T {}
