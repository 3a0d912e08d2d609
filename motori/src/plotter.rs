//! HP-GL plotter session.
//!
//! [`Plotter`] sits between a serial stream and a motion controller. The
//! receive path hands every byte to [`Plotter::intercept`] first, which
//! handles flow control and device-control instructions and tells the host
//! whether to buffer the byte. The foreground loop calls [`Plotter::poll`],
//! which reads buffered bytes, scans them into instructions and turns those
//! into a queue of pen and motion steps executed a few at a time.

use std::collections::VecDeque;

use log::{debug, error, info, trace, warn};

use motori_escape::{Actor, BufferLevel, DeviceError, Interceptor};
use motori_geom::{
    Arc, CharSize, DevicePoint, Direction, Label, Point, Rect, Transform,
    Wedge, clamp_chord_angle,
};
use motori_scan::{
    Command, DEFAULT_LABEL_TERMINATOR, Mnemonic, Params, Scan, Scanner,
};

use crate::hooks::{Hooks, Observer, PlotterEvent};
use crate::plan::{Step, Target, Trace};
use crate::report::{Report, Status};
use crate::{
    Host, HostState, HpglError, PenStatus, PlotterError, PlotterOptions,
    PlotterState, Result, StdTimeout, Stream, Timeout,
};

/// First line written when a session starts.
pub const BANNER: &str = "Motori HPGL v0.03";

const PLUGIN_INFO: &str = "[PLUGIN:HPGL v0.03]";

/// Default relative character size, percent of P2 - P1.
const RELATIVE_CHAR_SIZE: (f32, f32) = (0.75, 1.5);

/// Conversion from `VS` centimetres per second to mm/min.
const CM_PER_S_TO_MM_PER_MIN: f32 = 600.0;

type DispatchResult = std::result::Result<(), HpglError>;

/// What the foreground loop is busy with.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Process {
    /// Reading and scanning input.
    #[default]
    Idle,
    /// Executing queued steps.
    Tracing,
    /// Waiting for the homing cycle.
    Homing,
    /// Waiting for the pen actuator.
    Settling,
}

/// Receive-path effects. Anything that is not a write is recorded and
/// carried out by the next poll.
struct Receiver<'a, S> {
    stream: &'a mut S,
    hooks: &'a mut Hooks,
    cancel: &'a mut Option<bool>,
    abort_graphics: &'a mut bool,
}

impl<S: Stream> Actor for Receiver<'_, S> {
    fn send(&mut self, bytes: &[u8]) {
        self.stream.write(bytes);
    }

    fn cancel(&mut self, incomplete: bool) {
        *self.cancel = Some(incomplete);
    }

    fn abort_graphics(&mut self) {
        *self.abort_graphics = true;
    }

    fn device_error(&mut self, err: DeviceError) {
        debug!("[plotter] device control error {}: {err}", err.code());
        self.hooks.notify(PlotterEvent::DeviceError(err));
    }
}

pub struct Plotter<H: Host, T: Timeout = StdTimeout> {
    host: H,
    options: PlotterOptions,
    scanner: Scanner,
    interceptor: Interceptor,
    state: PlotterState,
    label: Label,
    /// Pen to restore once the current label ends.
    label_pen: Option<PenStatus>,
    plan: VecDeque<Step>,
    process: Process,
    /// Homing started the session and ends with `Ready...`.
    announce: bool,
    pen: PenStatus,
    settle: T,
    idle: T,
    /// Machine position of plotter step (0, 0), in millimetres.
    origin: Point,
    host_state: HostState,
    cancel: Option<bool>,
    abort_graphics: bool,
    active: bool,
    hooks: Hooks,
}

impl<H: Host, T: Timeout> Plotter<H, T> {
    pub fn new(host: H, options: PlotterOptions) -> Self {
        let state = PlotterState::new(&options);
        let label = Label::begin(
            Point::ORIGIN,
            state.attributes.char_size,
            state.attributes.direction,
        );

        Self {
            host,
            scanner: Scanner::new(),
            interceptor: Interceptor::new(
                options.handshake(),
                options.output_mode(),
            ),
            state,
            label,
            label_pen: None,
            plan: VecDeque::new(),
            process: Process::Idle,
            announce: false,
            pen: PenStatus::Unknown,
            settle: T::default(),
            idle: T::default(),
            origin: Point::ORIGIN,
            host_state: HostState::Idle,
            cancel: None,
            abort_graphics: false,
            active: false,
            hooks: Hooks::default(),
            options,
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    #[inline]
    pub fn options(&self) -> &PlotterOptions {
        &self.options
    }

    #[inline]
    pub fn state(&self) -> &PlotterState {
        &self.state
    }

    #[inline]
    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    #[inline]
    pub fn pen(&self) -> PenStatus {
        self.pen
    }

    #[inline]
    pub fn process(&self) -> Process {
        self.process
    }

    /// Between a successful [`start`](Self::start) and cancel or failure.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// No queued work and nothing in progress.
    pub fn is_idle(&self) -> bool {
        self.process == Process::Idle && self.plan.is_empty()
    }

    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.hooks.push(observer);
    }

    /// Identification line for the host's option report.
    pub fn report_options(&self) -> &'static str {
        PLUGIN_INFO
    }

    /// Open a session: write the banner and home the machine, or initialise
    /// right away when homing is disabled.
    pub fn start(&mut self) -> Result<()> {
        self.scanner.reset();
        self.interceptor.reset();
        self.plan.clear();
        self.settle.clear_timeout();
        self.idle.clear_timeout();
        self.cancel = None;
        self.abort_graphics = false;
        self.process = Process::Idle;
        self.active = true;

        info!("[plotter] session started");
        self.write_line(BANNER.as_bytes());
        self.hooks.notify(PlotterEvent::Started);

        if !self.options.home_on_start {
            self.origin = self.host.current_position();
            self.homed();
            return Ok(());
        }

        if !self.begin_homing(true) {
            self.fail_session();
            return Err(PlotterError::HomingRejected);
        }
        Ok(())
    }

    /// Receive-path entry point. Returns `true` when the byte was consumed
    /// and must not be buffered.
    pub fn intercept(&mut self, byte: u8) -> bool {
        if !self.active {
            return false;
        }

        let level = self.level();
        let mut receiver = Receiver {
            stream: &mut self.host,
            hooks: &mut self.hooks,
            cancel: &mut self.cancel,
            abort_graphics: &mut self.abort_graphics,
        };
        self.interceptor.intercept(byte, level, &mut receiver)
    }

    /// Foreground step, called once per main loop iteration.
    ///
    /// A cancel byte seen by [`Plotter::intercept`] only ends the session
    /// here, at the start of the next poll.
    pub fn poll(&mut self) -> Result<()> {
        if !self.active {
            return Err(PlotterError::Inactive);
        }

        if let Some(incomplete) = self.cancel.take() {
            self.end_session(incomplete);
            return Ok(());
        }

        if std::mem::take(&mut self.abort_graphics) {
            self.discard_graphics();
        }

        match self.process {
            Process::Homing => self.await_homing()?,
            Process::Settling => {
                if !self.settle.pending_timeout() {
                    self.settle.clear_timeout();
                    self.process = Process::Tracing;
                }
            },
            Process::Tracing => self.run_plan(),
            Process::Idle => self.read_input(),
        }

        self.lift_idle_pen();
        self.drain();
        Ok(())
    }

    /// The motion controller changed state. Leaving a jog takes the new
    /// machine position as the pen position.
    pub fn on_state_change(&mut self, state: HostState) {
        let previous = std::mem::replace(&mut self.host_state, state);
        if previous != HostState::Jog || state != HostState::Idle {
            return;
        }

        let mm = self.host.current_position() - self.origin;
        let device = (mm * self.options.units_per_mm).round();
        let user = self.state.transform.to_user(device.to_point());
        debug!("[plotter] jogged to {device:?}");
        self.state.locate(device, user);
    }

    fn level(&self) -> BufferLevel {
        BufferLevel::new(
            self.host.rx_free(),
            self.host.rx_count(),
            self.host.rx_capacity(),
        )
    }

    fn drain(&mut self) {
        let level = self.level();
        let mut receiver = Receiver {
            stream: &mut self.host,
            hooks: &mut self.hooks,
            cancel: &mut self.cancel,
            abort_graphics: &mut self.abort_graphics,
        };
        self.interceptor.drain(level, &mut receiver);
    }

    fn write_line(&mut self, text: &[u8]) {
        let mut line = text.to_vec();
        line.extend_from_slice(&self.interceptor.output().terminator);
        self.host.write(&line);
    }

    fn write_report(&mut self, report: Report) {
        trace!("[plotter] report {report}");
        let body = report.to_string();
        let line = self.interceptor.output().frame(body.as_bytes());
        self.host.write(&line);
    }

    fn begin_homing(&mut self, announce: bool) -> bool {
        debug!("[plotter] homing");
        if !self.host.home() {
            return false;
        }
        self.announce = announce;
        self.process = Process::Homing;
        true
    }

    fn await_homing(&mut self) -> Result<()> {
        match self.host.state() {
            HostState::Idle => {
                self.origin = self.host.current_position();
                debug!("[plotter] homed, origin {:?}", self.origin);
                self.process = Process::Tracing;
                if std::mem::take(&mut self.announce) {
                    self.homed();
                } else {
                    self.state.locate(
                        DevicePoint::ORIGIN,
                        self.state.transform.to_user(Point::ORIGIN),
                    );
                }
                Ok(())
            },
            HostState::Alarm => {
                self.fail_session();
                Err(PlotterError::HomingFailed)
            },
            HostState::Busy | HostState::Jog => Ok(()),
        }
    }

    /// The machine stands at the device origin with the pen up.
    fn homed(&mut self) {
        self.host.set_pen(false);
        self.host.pen_led(false);
        self.pen = PenStatus::Up;
        self.state.locate(DevicePoint::ORIGIN, Point::ORIGIN);
        self.initialize();

        info!("[plotter] ready");
        self.write_line(b"Ready...");
        self.hooks.notify(PlotterEvent::Ready);
    }

    fn fail_session(&mut self) {
        error!("[plotter] homing failed");
        self.process = Process::Idle;
        self.plan.clear();
        self.write_line(b"Failed...");
        self.active = false;
        self.hooks.notify(PlotterEvent::Ended);
    }

    /// Cancel byte: drop everything, lift the pen and hand the stream back.
    fn end_session(&mut self, incomplete: bool) {
        info!("[plotter] cancelled");
        self.plan.clear();
        self.scanner.reset();
        self.label_pen = None;
        self.settle.clear_timeout();
        self.idle.clear_timeout();
        self.process = Process::Idle;

        if incomplete {
            let code = DeviceError::InvalidByte.code().to_string();
            self.write_line(code.as_bytes());
        }

        self.host.synchronize();
        if self.pen != PenStatus::Up {
            self.host.set_pen(false);
            self.host.pen_led(false);
            self.pen = PenStatus::Up;
        }

        self.write_line(b"Bye...");
        self.active = false;
        self.hooks.notify(PlotterEvent::Ended);
    }

    fn discard_graphics(&mut self) {
        debug!("[plotter] abort graphics");
        self.host.flush_rx();
        self.scanner.reset();
        self.plan.clear();
        self.label_pen = None;
        if self.process == Process::Tracing {
            self.process = Process::Idle;
        }
        self.hooks.notify(PlotterEvent::GraphicsAborted);
    }

    fn lift_idle_pen(&mut self) {
        if self.process != Process::Idle
            || self.pen != PenStatus::Down
            || !self.idle.expired_timeout()
        {
            return;
        }

        debug!("[plotter] pen idle, lifting");
        self.idle.clear_timeout();
        self.host.set_pen(false);
        self.host.pen_led(false);
        self.pen = PenStatus::Timeout;
        self.hooks.notify(PlotterEvent::PenChanged(PenStatus::Timeout));
    }

    fn read_input(&mut self) {
        if !self.host.is_online() {
            return;
        }

        let mut budget = self.options.steps_per_poll.max(1);
        while budget > 0 && self.plan.is_empty() && self.cancel.is_none() {
            let Some(byte) = self.host.read() else {
                break;
            };
            budget -= 1;
            self.feed(byte);
        }

        if !self.plan.is_empty() {
            self.process = Process::Tracing;
            self.run_plan();
        }
    }

    fn feed(&mut self, byte: u8) {
        match self.scanner.advance(byte) {
            Scan::Continue => {},
            Scan::Command(command) => self.dispatch(command),
            Scan::LabelStart => self.begin_label(),
            Scan::Label(byte) => {
                let glyph = self.label.glyph(byte);
                self.plan.push_back(Step::Trace(Trace::Glyph(glyph)));
            },
            Scan::LabelEnd => {
                if let Some(pen) = self.label_pen.take() {
                    self.plan.push_back(Step::Pen(pen));
                }
            },
            Scan::Error(err) => {
                debug!("[plotter] {err}");
                self.fail(err.into());
            },
        }
    }

    fn fail(&mut self, err: HpglError) {
        debug!("[plotter] error {}: {err}", err.code());
        let alert = self.state.errors.record(err);
        self.host.set_alert(alert);
        self.hooks.notify(PlotterEvent::Error(err));
    }

    fn run_plan(&mut self) {
        for _ in 0..self.options.steps_per_poll.max(1) {
            if self.process != Process::Tracing || self.cancel.is_some() {
                return;
            }
            let Some(step) = self.plan.pop_front() else {
                break;
            };
            self.execute(step);
        }

        if self.process == Process::Tracing && self.plan.is_empty() {
            self.process = Process::Idle;
        }
    }

    fn execute(&mut self, step: Step) {
        match step {
            Step::Pen(status) => self.set_pen(status),
            Step::Move(target) => self.move_to(target),
            Step::Trace(mut trace) => {
                if let Some((target, pen)) = trace.next_move() {
                    self.plan.push_front(Step::Trace(trace));
                    self.plan.push_front(Step::Move(target));
                    if let Some(pen) = pen {
                        self.plan.push_front(Step::Pen(pen));
                    }
                }
            },
            Step::Locate(user) => self.state.user_loc = user,
            Step::Select(pen) => self.host.select_pen(pen),
            Step::Home => {
                if !self.begin_homing(false) {
                    warn!("[plotter] motion controller refused to home");
                }
            },
        }
    }

    fn set_pen(&mut self, status: PenStatus) {
        if status == self.pen {
            return;
        }
        if status == PenStatus::Up && self.pen == PenStatus::Timeout {
            self.pen = PenStatus::Up;
            return;
        }

        debug!("[plotter] pen {status:?}");
        let down = status.is_down();
        self.host.synchronize();
        self.host.set_pen(down);
        self.host.pen_led(down);
        self.pen = status;

        self.settle.set_timeout(self.options.pen_delay(down));
        self.process = Process::Settling;
        if down {
            self.idle.set_timeout(self.options.pen_idle_timeout());
        } else {
            self.idle.clear_timeout();
        }
        self.hooks.notify(PlotterEvent::PenChanged(status));
    }

    fn move_to(&mut self, target: Target) {
        if self.pen == PenStatus::Timeout {
            self.plan.push_front(Step::Move(target));
            self.set_pen(PenStatus::Down);
            return;
        }

        let (device, user) = match target {
            Target::User(user) => self.state.transform.quantize(user),
            Target::Device(point) => {
                let device = point.round();
                (device, self.state.transform.to_user(device.to_point()))
            },
        };

        if !device.in_range() {
            warn!("[plotter] {device:?} overflows the plotter range");
            self.fail(HpglError::PosOverflow);
            return;
        }

        let limits = self.options.paper.limits();
        if device.x < 0
            || device.y < 0
            || device.x > limits.x
            || device.y > limits.y
        {
            warn!("[plotter] {device:?} is outside the plotting area");
            return;
        }

        let down = self.pen.is_down();
        let mm = self.to_mm(device);
        trace!("[plotter] move to {device:?} ({mm:?} mm), pen down: {down}");
        if !self.host.move_to(mm, !down, self.state.feed_rate) {
            warn!("[plotter] motion controller rejected move to {device:?}");
            return;
        }

        self.state.locate(device, user);
        if down {
            self.idle.set_timeout(self.options.pen_idle_timeout());
        }
    }

    /// Machine position of a plotter step.
    fn to_mm(&self, device: DevicePoint) -> Point {
        let units = self.options.units_per_mm;
        let offset = device.to_point();
        self.origin + Point::new(offset.x / units, offset.y / units)
    }

    /// Pen state the last pen instruction asked for.
    fn pen_intent(&self) -> PenStatus {
        PenStatus::intent(self.pen.intends_down())
    }

    fn chord_angle(&self, param: Option<f32>) -> f32 {
        param.map_or(self.state.attributes.chord_angle, clamp_chord_angle)
    }

    fn dispatch(&mut self, command: Command) {
        let Command { mnemonic, params } = command;
        trace!("[plotter] {mnemonic} {:?}", params.as_slice());
        self.hooks.notify(PlotterEvent::Command(mnemonic));
        if let Err(err) = self.perform(mnemonic, &params) {
            self.fail(err);
        }
    }

    fn perform(
        &mut self,
        mnemonic: Mnemonic,
        params: &Params,
    ) -> DispatchResult {
        let args = params.as_slice();
        match mnemonic {
            Mnemonic::PA | Mnemonic::PR => {
                self.state.attributes.plot_relative = mnemonic == Mnemonic::PR;
                self.plot(args)
            },
            Mnemonic::PU | Mnemonic::PD => {
                let pen = PenStatus::intent(mnemonic == Mnemonic::PD);
                self.plan.push_back(Step::Pen(pen));
                self.plot(args)
            },
            Mnemonic::AA | Mnemonic::AR => {
                self.arc(mnemonic == Mnemonic::AR, args)
            },
            Mnemonic::CI => self.circle(args),
            Mnemonic::EW => self.wedge(args),
            Mnemonic::EA | Mnemonic::ER => {
                self.rectangle(mnemonic == Mnemonic::ER, args)
            },
            // Label text and terminator are handled by the scanner.
            Mnemonic::LB | Mnemonic::DT => Ok(()),
            Mnemonic::DI | Mnemonic::DR => {
                self.direction(mnemonic == Mnemonic::DR, args)
            },
            Mnemonic::SI | Mnemonic::SR => {
                self.char_size(mnemonic == Mnemonic::SR, args)
            },
            Mnemonic::CP => self.character_plot(args),
            Mnemonic::IP => self.input_p1p2(args),
            Mnemonic::SC => self.scale(args),
            Mnemonic::IN => {
                self.initialize();
                self.park();
                Ok(())
            },
            Mnemonic::DF => {
                self.state.default_attributes(&self.options);
                self.label.set_size(self.state.attributes.char_size);
                self.label.set_direction(self.state.attributes.direction);
                Ok(())
            },
            Mnemonic::IH => {
                self.plan.push_back(Step::Pen(PenStatus::Up));
                self.plan.push_back(Step::Home);
                Ok(())
            },
            Mnemonic::IM => self.input_mask(args),
            Mnemonic::LT => self.line_type(args),
            Mnemonic::PT => self.pen_thickness(args),
            Mnemonic::AS => {
                self.state.acceleration = args.first().copied();
                Ok(())
            },
            Mnemonic::VS => self.velocity(args),
            Mnemonic::SP => self.select_pen(args),
            Mnemonic::PG => {
                self.park();
                Ok(())
            },
            Mnemonic::CS | Mnemonic::CA => {
                self.designate(mnemonic == Mnemonic::CA, args)
            },
            Mnemonic::SS | Mnemonic::SA => {
                self.state.attributes.use_alternate = mnemonic == Mnemonic::SA;
                Ok(())
            },
            Mnemonic::OA
            | Mnemonic::OC
            | Mnemonic::OE
            | Mnemonic::OF
            | Mnemonic::OI
            | Mnemonic::OP
            | Mnemonic::OS
            | Mnemonic::OW => {
                self.output(mnemonic);
                Ok(())
            },
        }
    }

    /// `IN`: everything back to power-on state. The pen position is kept.
    fn initialize(&mut self) {
        let device = self.state.device_loc;
        self.state = PlotterState::new(&self.options);
        self.state.locate(device, device.to_point());
        self.scanner.set_label_terminator(DEFAULT_LABEL_TERMINATOR);
        self.label = Label::begin(
            device.to_point(),
            self.state.attributes.char_size,
            self.state.attributes.direction,
        );
        self.label_pen = None;
        self.host.set_alert(false);
    }

    /// Pen up and move to plotter step (0, 0).
    fn park(&mut self) {
        self.plan.push_back(Step::Pen(PenStatus::Up));
        self.plan.push_back(Step::Move(Target::Device(Point::ORIGIN)));
    }

    fn plot(&mut self, args: &[f32]) -> DispatchResult {
        match *args {
            [] => Ok(()),
            [x, y] => {
                let mut target = Point::new(x, y);
                if self.state.attributes.plot_relative {
                    target = self.state.user_loc + target;
                }
                self.plan.push_back(Step::Move(Target::User(target)));
                Ok(())
            },
            _ => Err(HpglError::WrongParams),
        }
    }

    fn arc(&mut self, relative: bool, args: &[f32]) -> DispatchResult {
        let (center, sweep, chord) = match *args {
            [x, y, sweep] => (Point::new(x, y), sweep, None),
            [x, y, sweep, chord] => (Point::new(x, y), sweep, Some(chord)),
            _ => return Err(HpglError::WrongParams),
        };
        let center = if relative {
            self.state.user_loc + center
        } else {
            center
        };

        let start = self.state.user_loc;
        match Arc::new(center, start, sweep, self.chord_angle(chord)) {
            Ok(arc) => self.plan.push_back(Step::Trace(Trace::Arc(arc))),
            Err(err) => debug!("[plotter] {err}, nothing drawn"),
        }
        Ok(())
    }

    fn circle(&mut self, args: &[f32]) -> DispatchResult {
        let (radius, chord) = match *args {
            [radius] => (radius, None),
            [radius, chord] => (radius, Some(chord)),
            _ => return Err(HpglError::WrongParams),
        };

        let center = self.state.user_loc;
        let arc = match Arc::circle(center, radius, self.chord_angle(chord)) {
            Ok(arc) => arc,
            Err(err) => {
                debug!("[plotter] {err}, nothing drawn");
                return Ok(());
            },
        };

        let pen = self.pen_intent();
        self.plan.extend([
            Step::Pen(PenStatus::Up),
            Step::Move(Target::User(arc.start())),
            Step::Pen(PenStatus::Down),
            Step::Trace(Trace::Arc(arc)),
            Step::Pen(PenStatus::Up),
            Step::Move(Target::User(center)),
            Step::Locate(center),
            Step::Pen(pen),
        ]);
        Ok(())
    }

    fn wedge(&mut self, args: &[f32]) -> DispatchResult {
        let (radius, start, sweep, chord) = match *args {
            [radius, start, sweep] => (radius, start, sweep, None),
            [radius, start, sweep, chord] => {
                (radius, start, sweep, Some(chord))
            },
            _ => return Err(HpglError::WrongParams),
        };

        let center = self.state.user_loc;
        let step = self.chord_angle(chord);
        let wedge = match Wedge::new(center, radius, start, sweep, step) {
            Ok(wedge) => wedge,
            Err(err) => {
                debug!("[plotter] {err}, nothing drawn");
                return Ok(());
            },
        };

        let pen = self.pen_intent();
        self.plan.extend([
            Step::Pen(PenStatus::Down),
            Step::Trace(Trace::Wedge(wedge)),
            Step::Locate(center),
            Step::Pen(pen),
        ]);
        Ok(())
    }

    fn rectangle(&mut self, relative: bool, args: &[f32]) -> DispatchResult {
        let [x, y] = *args else {
            return Err(HpglError::WrongParams);
        };

        let start = self.state.user_loc;
        let corner = if relative {
            start + Point::new(x, y)
        } else {
            Point::new(x, y)
        };

        let pen = self.pen_intent();
        self.plan.extend([
            Step::Pen(PenStatus::Down),
            Step::Move(Target::User(Point::new(corner.x, start.y))),
            Step::Move(Target::User(corner)),
            Step::Move(Target::User(Point::new(start.x, corner.y))),
            Step::Move(Target::User(start)),
            Step::Locate(start),
            Step::Pen(pen),
        ]);
        Ok(())
    }

    /// Start a label, or continue the previous one when the pen has not
    /// moved since.
    fn begin_label(&mut self) {
        self.label_pen = Some(self.pen_intent());

        let size = self.state.attributes.char_size;
        let direction = self.state.attributes.direction;
        if self.label.cursor().round() == self.state.device_loc {
            self.label.set_size(size);
            self.label.set_direction(direction);
            return;
        }
        self.label =
            Label::begin(self.state.device_loc.to_point(), size, direction);
    }

    fn direction(&mut self, relative: bool, args: &[f32]) -> DispatchResult {
        let direction = match *args {
            [] => Some(Direction::HORIZONTAL),
            [run, rise] if relative => {
                Direction::relative(run, rise, self.state.ip_span())
            },
            [run, rise] => Direction::new(run, rise),
            _ => return Err(HpglError::WrongParams),
        };
        let direction = direction.ok_or(HpglError::BadParam)?;

        self.state.attributes.direction = direction;
        self.label.set_direction(direction);
        Ok(())
    }

    fn char_size(&mut self, relative: bool, args: &[f32]) -> DispatchResult {
        let span = self.state.ip_span();
        let size = match *args {
            [] if relative => {
                let (width, height) = RELATIVE_CHAR_SIZE;
                CharSize::relative(width, height, span)
            },
            [] => CharSize::standard(self.options.units_per_mm),
            [width, height] if relative => {
                CharSize::relative(width, height, span)
            },
            [width, height] => {
                CharSize::from_cm(width, height, self.options.units_per_mm)
            },
            _ => return Err(HpglError::WrongParams),
        };
        if !(size.width.is_finite() && size.height.is_finite()) {
            return Err(HpglError::BadParam);
        }

        self.state.attributes.char_size = size;
        self.label.set_size(size);
        Ok(())
    }

    fn character_plot(&mut self, args: &[f32]) -> DispatchResult {
        self.label.set_cursor(self.state.device_loc.to_point());
        let target = match *args {
            [] => self.label.new_line(),
            [spaces, lines] => self.label.plot(spaces, lines),
            _ => return Err(HpglError::WrongParams),
        };

        let pen = self.pen_intent();
        self.plan.extend([
            Step::Pen(PenStatus::Up),
            Step::Move(Target::Device(target)),
            Step::Pen(pen),
        ]);
        Ok(())
    }

    fn input_p1p2(&mut self, args: &[f32]) -> DispatchResult {
        let ip = match *args {
            [] => self.options.paper.scaling_points(),
            [x, y] => {
                let p1 = Point::new(x, y);
                Rect::new(p1, p1 + self.state.ip.span())
            },
            [x1, y1, x2, y2] => {
                Rect::new(Point::new(x1, y1), Point::new(x2, y2))
            },
            _ => return Err(HpglError::WrongParams),
        };
        let ip =
            Rect::new(ip.min.round().to_point(), ip.max.round().to_point());

        // Validates P1/P2 even while scaling is off.
        let sc = self.state.sc;
        let transform = Transform::from_rects(ip, sc.unwrap_or(ip))
            .map_err(|_| HpglError::WrongParams)?;
        let transform = if sc.is_some() {
            transform
        } else {
            Transform::identity()
        };

        debug!("[plotter] P1 {:?}, P2 {:?}", ip.min, ip.max);
        self.state.ip = ip;
        self.state.set_scaling(sc, transform);
        self.state.status.insert(Status::P1P2_CHANGED);
        Ok(())
    }

    fn scale(&mut self, args: &[f32]) -> DispatchResult {
        match *args {
            [] => {
                self.state.set_scaling(None, Transform::identity());
                Ok(())
            },
            [x_min, x_max, y_min, y_max] => {
                let sc = Rect::new(
                    Point::new(x_min, y_min),
                    Point::new(x_max, y_max),
                );
                let transform = Transform::from_rects(self.state.ip, sc)
                    .map_err(|_| HpglError::WrongParams)?;
                self.state.set_scaling(Some(sc), transform);
                Ok(())
            },
            _ => Err(HpglError::WrongParams),
        }
    }

    fn input_mask(&mut self, args: &[f32]) -> DispatchResult {
        let mask = match args.first() {
            None => self.options.alert_mask,
            Some(&mask) if (0.0..=255.0).contains(&mask) => mask as u8,
            Some(_) => return Err(HpglError::BadParam),
        };

        let alert = self.state.errors.set_alert_mask(mask);
        self.host.set_alert(alert);
        Ok(())
    }

    fn line_type(&mut self, args: &[f32]) -> DispatchResult {
        self.state.attributes.line_type = match *args {
            [] => None,
            [pattern] => Some(crate::LineType {
                pattern,
                length: None,
            }),
            [pattern, length] => Some(crate::LineType {
                pattern,
                length: Some(length),
            }),
            _ => return Err(HpglError::WrongParams),
        };
        Ok(())
    }

    fn pen_thickness(&mut self, args: &[f32]) -> DispatchResult {
        self.state.pen_thickness = match args.first() {
            None => PlotterState::DEFAULT_PEN_THICKNESS,
            Some(&thickness) if thickness > 0.0 => thickness,
            Some(_) => return Err(HpglError::BadParam),
        };
        Ok(())
    }

    fn velocity(&mut self, args: &[f32]) -> DispatchResult {
        self.state.feed_rate = match args.first() {
            None => self.options.feed_rate,
            Some(&speed) if speed > 0.0 => speed * CM_PER_S_TO_MM_PER_MIN,
            Some(_) => return Err(HpglError::BadParam),
        };
        debug!("[plotter] feed rate {} mm/min", self.state.feed_rate);
        Ok(())
    }

    fn select_pen(&mut self, args: &[f32]) -> DispatchResult {
        let pen = match args.first() {
            None => 0,
            Some(&pen) if (0.0..=255.0).contains(&pen) => pen as u8,
            Some(_) => return Err(HpglError::BadParam),
        };

        self.state.pen_number = pen;
        self.plan.push_back(Step::Pen(PenStatus::Up));
        self.plan.push_back(Step::Select(pen));
        if pen == 0 {
            self.plan.push_back(Step::Move(Target::Device(Point::ORIGIN)));
        }
        Ok(())
    }

    fn designate(&mut self, alternate: bool, args: &[f32]) -> DispatchResult {
        let set = args.first().copied().unwrap_or(0.0);
        if set != 0.0 {
            return Err(HpglError::UnknownCharset);
        }

        let attributes = &mut self.state.attributes;
        if alternate {
            attributes.alternate_set = 0;
        } else {
            attributes.standard_set = 0;
        }
        Ok(())
    }

    fn output(&mut self, mnemonic: Mnemonic) {
        let report = match mnemonic {
            Mnemonic::OA => Report::Position {
                x: self.state.device_loc.x as f32,
                y: self.state.device_loc.y as f32,
                pen_down: self.pen.is_down(),
            },
            Mnemonic::OC => Report::Position {
                x: self.state.user_loc.x,
                y: self.state.user_loc.y,
                pen_down: self.pen.intends_down(),
            },
            Mnemonic::OE => {
                let error = self.state.errors.take();
                let code = error.map_or(0, HpglError::code);
                self.host.set_alert(false);
                Report::Error(code)
            },
            Mnemonic::OF => Report::Factors(self.options.units_per_mm),
            Mnemonic::OI => Report::Identification,
            Mnemonic::OP => {
                self.state.status.remove(Status::P1P2_CHANGED);
                Report::ScalingPoints(self.state.ip)
            },
            Mnemonic::OS => {
                let status = self.status();
                self.state.status.remove(Status::INITIALIZED);
                Report::Status(status)
            },
            Mnemonic::OW => Report::Window(self.options.paper.limits()),
            _ => return,
        };
        self.write_report(report);
    }

    fn status(&self) -> Status {
        let mut status = self.state.status | Status::READY;
        status.set(Status::PEN_DOWN, self.pen.is_down());
        status.set(Status::ERROR, self.state.errors.mask() != 0);
        status
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use motori_escape::FlowState;

    use super::*;
    use crate::fake::{FakeHost, ManualTimeout};
    use crate::hooks::Propagation;

    type TestPlotter = Plotter<FakeHost, ManualTimeout>;

    fn options() -> PlotterOptions {
        PlotterOptions {
            home_on_start: false,
            ..PlotterOptions::default()
        }
    }

    fn started(options: PlotterOptions) -> TestPlotter {
        let mut plotter = Plotter::new(FakeHost::new(), options);
        plotter.start().unwrap();
        plotter.host_mut().output.clear();
        plotter
    }

    /// Deliver bytes through the receive path.
    fn send(plotter: &mut TestPlotter, bytes: &[u8]) {
        for byte in bytes {
            if !plotter.intercept(*byte) {
                plotter.host_mut().rx.push_back(*byte);
            }
        }
    }

    /// Poll until everything received has been plotted.
    fn settle(plotter: &mut TestPlotter) {
        for _ in 0..100_000 {
            if !plotter.is_active() {
                return;
            }
            plotter.poll().unwrap();
            ManualTimeout::advance_ms(10);
            if plotter.is_idle() && plotter.host().rx.is_empty() {
                return;
            }
        }
        panic!("plotter never became idle");
    }

    fn run(plotter: &mut TestPlotter, bytes: &[u8]) {
        send(plotter, bytes);
        settle(plotter);
    }

    fn output(plotter: &TestPlotter) -> String {
        String::from_utf8_lossy(&plotter.host().output).into_owned()
    }

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    /// Millimetres of plotter step `(x, y)` with the origin at zero.
    fn mm(x: f32, y: f32) -> Point {
        Point::new(x / 40.0, y / 40.0)
    }

    #[test]
    fn start_without_homing_is_ready() {
        let mut plotter: TestPlotter =
            Plotter::new(FakeHost::new(), options());
        plotter.start().unwrap();
        assert!(plotter.is_active());
        assert_eq!(output(&plotter), "Motori HPGL v0.03\r\nReady...\r\n");
        assert_eq!(plotter.pen(), PenStatus::Up);
        assert_eq!(plotter.report_options(), "[PLUGIN:HPGL v0.03]");
    }

    #[test]
    fn homing_waits_for_idle() {
        let mut host = FakeHost::new();
        host.state = HostState::Busy;
        host.position = Point::new(5.0, 7.0);
        let mut plotter: TestPlotter =
            Plotter::new(host, PlotterOptions::default());
        plotter.start().unwrap();
        assert_eq!(plotter.process(), Process::Homing);
        plotter.poll().unwrap();
        assert_eq!(output(&plotter), "Motori HPGL v0.03\r\n");

        plotter.host_mut().state = HostState::Idle;
        plotter.poll().unwrap();
        assert!(output(&plotter).ends_with("Ready...\r\n"));

        run(&mut plotter, b"PA40,80;");
        assert_eq!(plotter.host().moves, vec![(Point::new(6.0, 9.0), true)]);
    }

    #[test]
    fn homing_alarm_fails_the_session() {
        let mut host = FakeHost::new();
        host.state = HostState::Busy;
        let mut plotter: TestPlotter =
            Plotter::new(host, PlotterOptions::default());
        plotter.start().unwrap();
        plotter.host_mut().state = HostState::Alarm;
        assert!(matches!(plotter.poll(), Err(PlotterError::HomingFailed)));
        assert!(output(&plotter).ends_with("Failed...\r\n"));
        assert!(matches!(plotter.poll(), Err(PlotterError::Inactive)));
    }

    #[test]
    fn refused_homing() {
        let mut host = FakeHost::new();
        host.home_accepted = false;
        let mut plotter: TestPlotter =
            Plotter::new(host, PlotterOptions::default());
        assert!(matches!(plotter.start(), Err(PlotterError::HomingRejected)));
        assert!(!plotter.is_active());
    }

    #[test]
    fn pen_and_absolute_moves() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA100,200;PD;PA300,400;PU;");

        assert_eq!(
            plotter.host().moves,
            vec![(mm(100.0, 200.0), true), (mm(300.0, 400.0), false)]
        );
        assert_eq!(plotter.host().pen, vec![false, true, false]);
        assert_eq!(plotter.state().device_loc, DevicePoint::new(300, 400));
        // Every pen change waits for motion first.
        assert_eq!(plotter.host().syncs, 2);
    }

    #[test]
    fn relative_moves_accumulate() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA100,100;PR10,0,0,10,-5,-5;");
        assert_eq!(plotter.state().device_loc, DevicePoint::new(105, 105));
        assert_eq!(plotter.host().moves.len(), 4);
    }

    #[test]
    fn default_chord_angle_for_arcs() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA1010,1000;PD;AA1000,1000,90;");
        // 90 degrees in 5 degree chords.
        assert_eq!(plotter.host().moves.len(), 1 + 18);
        assert_eq!(plotter.state().device_loc, DevicePoint::new(1000, 1010));
    }

    #[test]
    fn explicit_chord_angle_is_clamped() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA1100,1000;AR-100,0,180,400;");
        assert_eq!(plotter.host().moves.len(), 2);
        assert_eq!(plotter.state().device_loc, DevicePoint::new(900, 1000));
    }

    #[test]
    fn degenerate_arc_draws_nothing() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA1000,1000;AA1000,1000,90;AA0,0,0;");
        assert_eq!(plotter.host().moves.len(), 1);
        assert_eq!(plotter.state().errors.mask(), 0);
    }

    #[test]
    fn circle_returns_to_center_and_restores_pen() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA2000,2000;CI100,90;");

        let host = plotter.host();
        assert_eq!(host.moves.first(), Some(&(mm(2000.0, 2000.0), true)));
        assert_eq!(host.moves[1], (mm(2100.0, 2000.0), true));
        // Four chords drawn with the pen down.
        let drawn = host.moves.iter().filter(|(_, rapid)| !rapid).count();
        assert_eq!(drawn, 4);
        assert_eq!(host.moves.last(), Some(&(mm(2000.0, 2000.0), true)));
        assert_eq!(host.pen, vec![false, true, false]);
        assert_eq!(plotter.pen(), PenStatus::Up);
        assert_eq!(plotter.state().user_loc, Point::new(2000.0, 2000.0));
    }

    #[test]
    fn rectangle_outline() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA100,100;ER50,20;");
        let corners: Vec<Point> =
            plotter.host().moves.iter().skip(1).map(|(p, _)| *p).collect();
        assert_eq!(
            corners,
            vec![
                mm(150.0, 100.0),
                mm(150.0, 120.0),
                mm(100.0, 120.0),
                mm(100.0, 100.0),
            ]
        );
        assert_eq!(plotter.pen(), PenStatus::Up);
    }

    #[test]
    fn wedge_ends_at_center() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA1000,1000;PD;EW100,0,90,45;");
        let last = plotter.host().moves.last().copied();
        assert_eq!(last, Some((mm(1000.0, 1000.0), false)));
        assert_eq!(plotter.pen(), PenStatus::Down);
    }

    #[test]
    fn scaling_maps_user_units() {
        let mut plotter = started(options());
        run(&mut plotter, b"SC0,100,0,72;PA50,36;");
        assert_eq!(plotter.state().device_loc, DevicePoint::new(5603, 4121));
        assert!(close(plotter.state().user_loc, Point::new(50.0, 36.0)));

        run(&mut plotter, b"SC;");
        assert_eq!(plotter.state().user_loc, Point::new(5603.0, 4121.0));
    }

    #[test]
    fn degenerate_scaling_is_rejected() {
        let mut plotter = started(options());
        run(&mut plotter, b"SC0,100,0,72;SC5,5,0,10;");
        let last = plotter.state().errors.last();
        assert_eq!(last, Some(HpglError::WrongParams));
        let sc = Rect::new(Point::ORIGIN, Point::new(100.0, 72.0));
        assert_eq!(plotter.state().sc, Some(sc));

        run(&mut plotter, b"IP10,10,10,500;");
        let default_ip = PlotterOptions::default().paper.scaling_points();
        assert_eq!(plotter.state().ip, default_ip);
    }

    #[test]
    fn input_p1_keeps_the_span() {
        let mut plotter = started(options());
        run(&mut plotter, b"IP1000,1000;");
        let ip = plotter.state().ip;
        assert_eq!(ip.min, Point::new(1000.0, 1000.0));
        assert_eq!(ip.span(), Point::new(10000.0, 7200.0));

        run(&mut plotter, b"OS;OP;OS;");
        assert_eq!(output(&plotter), "26\r\n1000,1000,11000,8200\r\n16\r\n");
    }

    #[test]
    fn unknown_instruction_changes_nothing() {
        let mut plotter = started(options());
        run(&mut plotter, b"SC0,100,0,100;PA10,10;");
        let before = plotter.state().clone();

        run(&mut plotter, b"ZZ;");
        let after = plotter.state();
        assert_eq!(after.errors.last(), Some(HpglError::UnknownCommand));
        assert_eq!(after.user_loc, before.user_loc);
        assert_eq!(after.ip, before.ip);
        assert_eq!(after.sc, before.sc);

        run(&mut plotter, b"OE;OE;");
        assert_eq!(output(&plotter), "1\r\n0\r\n");
    }

    #[test]
    fn position_overflow() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA40000,0;");
        assert!(plotter.host().moves.is_empty());
        assert_eq!(plotter.state().errors.last(), Some(HpglError::PosOverflow));
    }

    #[test]
    fn moves_off_the_paper_are_skipped() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA20000,100;");
        assert!(plotter.host().moves.is_empty());
        assert_eq!(plotter.state().errors.mask(), 0);
        assert_eq!(plotter.state().device_loc, DevicePoint::ORIGIN);
    }

    #[test]
    fn label_draws_and_restores_pen() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA1000,1000;PD;LBL\x03PA2000,2000;");

        let host = plotter.host();
        // Standard size: 19 steps per grid column, 18 per row.
        assert_eq!(host.moves[1], (mm(1019.0, 1108.0), true));
        assert!(host.moves.iter().any(|(_, rapid)| !rapid));
        assert_eq!(plotter.pen(), PenStatus::Down);
        assert_eq!(plotter.state().device_loc, DevicePoint::new(2000, 2000));
    }

    #[test]
    fn label_terminator_can_be_changed() {
        let mut plotter = started(options());
        run(&mut plotter, b"DT#;PA1000,1000;LB  #PA1500,1000;");
        assert_eq!(plotter.state().device_loc, DevicePoint::new(1500, 1000));
        assert_eq!(plotter.host().moves.len(), 4);
    }

    #[test]
    fn character_plot_moves_by_cells() {
        let mut plotter = started(options());
        run(&mut plotter, b"SI1,1;PA1000,1000;CP2,0;");
        // One cell is 1.5 character widths of 10 mm.
        assert_eq!(plotter.state().device_loc, DevicePoint::new(2200, 1000));
    }

    #[test]
    fn text_attribute_errors() {
        let mut plotter = started(options());
        run(&mut plotter, b"DI0,0;");
        assert_eq!(plotter.state().errors.last(), Some(HpglError::BadParam));
        run(&mut plotter, b"CS1;");
        let last = plotter.state().errors.last();
        assert_eq!(last, Some(HpglError::UnknownCharset));
        run(&mut plotter, b"CA0;SA;DI0,1;");
        assert!(plotter.state().attributes.use_alternate);
        let up = Direction::new(0.0, 1.0).unwrap();
        assert_eq!(plotter.state().attributes.direction, up);
    }

    #[test]
    fn velocity_select() {
        let mut plotter = started(options());
        run(&mut plotter, b"VS5;PA100,100;");
        assert_eq!(plotter.state().feed_rate, 3000.0);
        assert_eq!(plotter.host().feeds, vec![3000.0]);
        run(&mut plotter, b"VS;");
        assert_eq!(plotter.state().feed_rate, 1000.0);
    }

    #[test]
    fn select_pen_zero_parks() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA500,500;PD;SP2;SP0;");
        let host = plotter.host();
        assert_eq!(host.selected, vec![2, 0]);
        assert_eq!(host.moves.last(), Some(&(Point::ORIGIN, true)));
        assert_eq!(plotter.pen(), PenStatus::Up);
        assert_eq!(plotter.state().pen_number, 0);
    }

    #[test]
    fn initialize_resets_state_and_parks() {
        let mut plotter = started(options());
        run(&mut plotter, b"IP0,0,1000,1000;SC0,10,0,10;PA5,5;ZZ;IN;");
        let state = plotter.state();
        assert_eq!(state.sc, None);
        assert_eq!(state.errors.mask(), 0);
        assert_eq!(state.device_loc, DevicePoint::ORIGIN);
        assert_eq!(state.ip, PlotterOptions::default().paper.scaling_points());
        assert!(!plotter.host().alert);
    }

    #[test]
    fn outputs() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA100,200;PD;OA;OC;OF;OI;OW;");
        assert_eq!(
            output(&plotter),
            "100,200,1\r\n100,200,1\r\n40,40\r\n7475A\r\n0,0,11040,7721\r\n"
        );
    }

    #[test]
    fn alert_follows_input_mask() {
        let mut plotter = started(options());
        run(&mut plotter, b"IM0;ZZ;");
        assert!(!plotter.host().alert);
        run(&mut plotter, b"IM1;");
        assert!(plotter.host().alert);
        run(&mut plotter, b"IM300;");
        assert_eq!(plotter.state().errors.last(), Some(HpglError::BadParam));
    }

    #[test]
    fn idle_pen_is_lifted_and_lowered_again() {
        let mut plotter = started(options());
        run(&mut plotter, b"PA100,100;PD;");
        assert_eq!(plotter.pen(), PenStatus::Down);

        ManualTimeout::advance_ms(60_000);
        plotter.poll().unwrap();
        assert_eq!(plotter.pen(), PenStatus::Timeout);
        assert_eq!(plotter.host().pen.last(), Some(&false));

        run(&mut plotter, b"PA200,100;");
        assert_eq!(plotter.pen(), PenStatus::Down);
        let last = plotter.host().moves.last().copied();
        assert_eq!(last, Some((mm(200.0, 100.0), false)));
    }

    #[test]
    fn cancel_ends_the_session() {
        let mut plotter = started(options());
        send(&mut plotter, b"PA100,100;PD;PA5");
        plotter.poll().unwrap();
        send(&mut plotter, &[0x18]);
        plotter.poll().unwrap();

        assert!(!plotter.is_active());
        assert_eq!(output(&plotter), "Bye...\r\n");
        assert_eq!(plotter.pen(), PenStatus::Up);
        assert_eq!(plotter.host().pen.last(), Some(&false));
        assert!(plotter.host().syncs > 0);
    }

    #[test]
    fn cancel_waits_for_the_next_poll() {
        let mut plotter = started(options());
        send(&mut plotter, &[0x18]);

        assert!(plotter.is_active());
        assert_eq!(output(&plotter), "");

        plotter.poll().unwrap();
        assert!(!plotter.is_active());
        assert_eq!(output(&plotter), "Bye...\r\n");
    }

    #[test]
    fn cancel_inside_device_control_reports_it() {
        let mut plotter = started(options());
        send(&mut plotter, b"\x1b.M10;");
        send(&mut plotter, &[0x18]);
        plotter.poll().unwrap();
        assert_eq!(output(&plotter), "12\r\nBye...\r\n");
    }

    #[test]
    fn xoff_once_and_xon_once() {
        let mut host = FakeHost::new();
        host.capacity = 300;
        let mut plotter: TestPlotter = Plotter::new(host, options());
        plotter.start().unwrap();
        plotter.host_mut().output.clear();

        // 150 buffered bytes leave 150 free, below the low water mark.
        send(&mut plotter, &[b' '; 150]);
        assert_eq!(plotter.host().output, vec![0x13]);

        settle(&mut plotter);
        assert_eq!(plotter.host().output, vec![0x13, 0x11]);
        plotter.poll().unwrap();
        assert_eq!(plotter.host().output, vec![0x13, 0x11]);
    }

    #[test]
    fn device_control_replies_are_framed() {
        let mut plotter = started(options());
        send(&mut plotter, b"\x1b.B\x1b.M;;;13:\x1b.L");
        assert_eq!(output(&plotter), "1024\r\n1024\r");
        assert_eq!(plotter.interceptor().state(), FlowState::Plain);
    }

    #[test]
    fn abort_graphics_discards_input() {
        let mut plotter = started(options());
        send(&mut plotter, b"PA100,100;");
        send(&mut plotter, b"\x1b.K");
        settle(&mut plotter);
        assert!(plotter.host().moves.is_empty());
    }

    #[test]
    fn jog_resynchronizes_position() {
        let mut plotter = started(options());
        plotter.on_state_change(HostState::Jog);
        plotter.host_mut().position = Point::new(10.0, 5.0);
        plotter.on_state_change(HostState::Idle);
        assert_eq!(plotter.state().device_loc, DevicePoint::new(400, 200));
        assert_eq!(plotter.state().user_loc, Point::new(400.0, 200.0));
    }

    #[test]
    fn observers_see_events_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut plotter: TestPlotter =
            Plotter::new(FakeHost::new(), options());
        let log = Rc::clone(&seen);
        plotter.add_observer(Box::new(move |event: &PlotterEvent| {
            log.borrow_mut().push(*event);
            Propagation::Continue
        }));
        plotter.start().unwrap();
        run(&mut plotter, b"PD;ZZ;");

        assert_eq!(
            *seen.borrow(),
            vec![
                PlotterEvent::Started,
                PlotterEvent::Ready,
                PlotterEvent::Command(Mnemonic::PD),
                PlotterEvent::PenChanged(PenStatus::Down),
                PlotterEvent::Error(HpglError::UnknownCommand),
            ]
        );
    }
}
