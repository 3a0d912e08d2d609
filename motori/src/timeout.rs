use std::time::{Duration, Instant};

/// Interface for creating timeouts and checking their expiry.
///
/// The plotter uses one timer for the pen actuator settle delay and one for
/// lifting an idle pen.
pub trait Timeout: Default {
    /// Arm the timer to expire `duration` from now.
    fn set_timeout(&mut self, duration: Duration);
    /// Disarm the timer.
    fn clear_timeout(&mut self);
    /// Returns whether the timer is armed and has not yet expired.
    fn pending_timeout(&self) -> bool;
    /// Returns whether the timer is armed and has expired.
    fn expired_timeout(&self) -> bool;
}

#[derive(Debug, Default)]
pub struct StdTimeout {
    timeout: Option<Instant>,
}

impl StdTimeout {
    /// Expiration time.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.timeout
    }
}

impl Timeout for StdTimeout {
    #[inline]
    fn set_timeout(&mut self, duration: Duration) {
        self.timeout = Some(Instant::now() + duration);
    }

    #[inline]
    fn clear_timeout(&mut self) {
        self.timeout = None;
    }

    #[inline]
    fn pending_timeout(&self) -> bool {
        self.timeout.is_some_and(|deadline| Instant::now() < deadline)
    }

    #[inline]
    fn expired_timeout(&self) -> bool {
        self.timeout.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn std_timeout_lifecycle() {
        let mut timeout = StdTimeout::default();
        assert!(!timeout.pending_timeout());
        assert!(!timeout.expired_timeout());

        timeout.set_timeout(Duration::from_secs(3600));
        assert!(timeout.pending_timeout());
        assert!(!timeout.expired_timeout());

        timeout.set_timeout(Duration::ZERO);
        assert!(timeout.expired_timeout());

        timeout.clear_timeout();
        assert!(timeout.deadline().is_none());
    }
}
