//! In-memory host and clock for tests.

use std::cell::Cell;
use std::collections::VecDeque;
use std::time::Duration;

use motori_geom::Point;

use crate::{Accessory, HostState, Motion, Stream, Timeout};

/// Records everything the plotter asks of it.
#[derive(Debug)]
pub struct FakeHost {
    pub rx: VecDeque<u8>,
    pub capacity: usize,
    pub output: Vec<u8>,
    /// Machine targets and whether they were rapid moves.
    pub moves: Vec<(Point, bool)>,
    pub feeds: Vec<f32>,
    pub pen: Vec<bool>,
    pub position: Point,
    pub state: HostState,
    pub home_accepted: bool,
    pub syncs: usize,
    pub selected: Vec<u8>,
    pub alert: bool,
    pub online: bool,
}

impl FakeHost {
    pub fn new() -> Self {
        Self {
            rx: VecDeque::new(),
            capacity: 1024,
            output: Vec::new(),
            moves: Vec::new(),
            feeds: Vec::new(),
            pen: Vec::new(),
            position: Point::ORIGIN,
            state: HostState::Idle,
            home_accepted: true,
            syncs: 0,
            selected: Vec::new(),
            alert: false,
            online: true,
        }
    }
}

impl Motion for FakeHost {
    fn move_to(&mut self, target: Point, rapid: bool, feed_rate: f32) -> bool {
        self.moves.push((target, rapid));
        if !rapid {
            self.feeds.push(feed_rate);
        }
        self.position = target;
        true
    }

    fn synchronize(&mut self) {
        self.syncs += 1;
    }

    fn current_position(&self) -> Point {
        self.position
    }

    fn set_pen(&mut self, down: bool) {
        self.pen.push(down);
    }

    fn home(&mut self) -> bool {
        self.home_accepted
    }

    fn state(&self) -> HostState {
        self.state
    }
}

impl Stream for FakeHost {
    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }

    fn rx_free(&self) -> usize {
        self.capacity.saturating_sub(self.rx.len())
    }

    fn rx_count(&self) -> usize {
        self.rx.len()
    }

    fn rx_capacity(&self) -> usize {
        self.capacity
    }

    fn flush_rx(&mut self) {
        self.rx.clear();
    }
}

impl Accessory for FakeHost {
    fn select_pen(&mut self, pen: u8) {
        self.selected.push(pen);
    }

    fn set_alert(&mut self, on: bool) {
        self.alert = on;
    }

    fn is_online(&self) -> bool {
        self.online
    }
}

thread_local! {
    static NOW: Cell<Duration> = const { Cell::new(Duration::ZERO) };
}

/// Timer driven by a per-thread clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualTimeout {
    deadline: Option<Duration>,
}

impl ManualTimeout {
    pub fn advance_ms(ms: u64) {
        NOW.with(|now| now.set(now.get() + Duration::from_millis(ms)));
    }

    fn now() -> Duration {
        NOW.with(Cell::get)
    }
}

impl Timeout for ManualTimeout {
    fn set_timeout(&mut self, duration: Duration) {
        self.deadline = Some(Self::now() + duration);
    }

    fn clear_timeout(&mut self) {
        self.deadline = None;
    }

    fn pending_timeout(&self) -> bool {
        self.deadline.is_some_and(|deadline| Self::now() < deadline)
    }

    fn expired_timeout(&self) -> bool {
        self.deadline.is_some_and(|deadline| Self::now() >= deadline)
    }
}
