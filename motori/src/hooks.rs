//! Observers of plotter events.
//!
//! Observers run in registration order. Any of them may stop the event from
//! reaching the ones registered after it.

use motori_escape::DeviceError;
use motori_scan::Mnemonic;

use crate::{HpglError, PenStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotterEvent {
    /// Banner written, homing may follow.
    Started,
    /// Homing finished and the plotter accepts input.
    Ready,
    Command(Mnemonic),
    PenChanged(PenStatus),
    Error(HpglError),
    DeviceError(DeviceError),
    /// `ESC . K` discarded buffered input.
    GraphicsAborted,
    /// The session ended, by cancel or failed homing.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    Continue,
    Stop,
}

pub trait Observer {
    fn notify(&mut self, event: &PlotterEvent) -> Propagation;
}

impl<F> Observer for F
where
    F: FnMut(&PlotterEvent) -> Propagation,
{
    fn notify(&mut self, event: &PlotterEvent) -> Propagation {
        self(event)
    }
}

#[derive(Default)]
pub struct Hooks {
    observers: Vec<Box<dyn Observer>>,
}

impl Hooks {
    pub fn push(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Deliver `event` in order until an observer stops it. Returns
    /// [`Propagation::Stop`] when one did.
    pub fn notify(&mut self, event: PlotterEvent) -> Propagation {
        for observer in &mut self.observers {
            if observer.notify(&event) == Propagation::Stop {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hooks")
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn recorder(
        seen: &Rc<RefCell<Vec<&'static str>>>,
        name: &'static str,
        result: Propagation,
    ) -> Box<dyn Observer> {
        let seen = Rc::clone(seen);
        Box::new(move |_: &PlotterEvent| {
            seen.borrow_mut().push(name);
            result
        })
    }

    #[test]
    fn observers_run_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::default();
        hooks.push(recorder(&seen, "first", Propagation::Continue));
        hooks.push(recorder(&seen, "second", Propagation::Continue));

        assert_eq!(hooks.notify(PlotterEvent::Ready), Propagation::Continue);
        assert_eq!(*seen.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn stop_skips_later_observers() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::default();
        hooks.push(recorder(&seen, "first", Propagation::Stop));
        hooks.push(recorder(&seen, "second", Propagation::Continue));

        assert_eq!(hooks.notify(PlotterEvent::Ended), Propagation::Stop);
        assert_eq!(*seen.borrow(), vec!["first"]);
        assert_eq!(hooks.len(), 2);
    }
}
