use std::ops::Range;

use log::debug;

use crate::{
    Actor, ControlCode, Device, DeviceCommand, DeviceControl, DeviceError,
    ExtendedStatus, Instruction,
};

/// Snapshot of the host receive buffer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BufferLevel {
    pub free: usize,
    pub count: usize,
    pub capacity: usize,
}

impl BufferLevel {
    pub fn new(free: usize, count: usize, capacity: usize) -> Self {
        Self {
            free,
            count,
            capacity,
        }
    }
}

/// How the interceptor throttles the sender.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Default XON/XOFF thresholds; enquiries are answered as well.
    #[default]
    Plain,
    /// Thresholds and characters configured by `ESC . I` / `ESC . N`.
    XonXoff,
    /// Enquiry/acknowledge only, no XON/XOFF.
    EnqAck,
    /// A device-control instruction is being received.
    Escape,
}

/// Handshake thresholds and characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handshake {
    /// XOFF goes out when fewer bytes than this remain free.
    pub low_water: usize,
    /// XON goes out once this many bytes are free again.
    pub high_water: usize,
    /// Free space an enquiry waits for before it is acknowledged.
    pub block_size: usize,
    pub enquiry: u8,
    pub acknowledge: Vec<u8>,
    pub xon: Vec<u8>,
    pub xoff: Vec<u8>,
}

impl Default for Handshake {
    fn default() -> Self {
        Self::new(200, 600, 80)
    }
}

impl Handshake {
    pub fn new(low_water: usize, high_water: usize, block_size: usize) -> Self {
        Self {
            low_water,
            high_water,
            block_size,
            enquiry: ControlCode::Enquiry.byte(),
            acknowledge: vec![ControlCode::Acknowledge.byte()],
            xon: vec![ControlCode::XOn.byte()],
            xoff: vec![ControlCode::XOff.byte()],
        }
    }
}

/// Framing of output lines, set by `ESC . M`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputMode {
    /// Milliseconds to wait before answering.
    pub turnaround_delay: u16,
    pub trigger: Option<u8>,
    pub echo_terminate: Option<u8>,
    pub terminator: Vec<u8>,
    pub initiator: Option<u8>,
}

impl Default for OutputMode {
    fn default() -> Self {
        Self::with_terminator(b"\r\n")
    }
}

impl OutputMode {
    pub fn with_terminator(terminator: &[u8]) -> Self {
        Self {
            turnaround_delay: 0,
            trigger: None,
            echo_terminate: None,
            terminator: terminator.to_vec(),
            initiator: None,
        }
    }

    /// `body` wrapped in the initiator and terminator.
    pub fn frame(&self, body: &[u8]) -> Vec<u8> {
        let mut line = Vec::with_capacity(body.len() + 3);
        line.extend(self.initiator);
        line.extend_from_slice(body);
        line.extend_from_slice(&self.terminator);
        line
    }
}

/// Receive-path filter in front of the host buffer.
#[derive(Debug)]
pub struct Interceptor {
    device: DeviceControl,
    defaults: (Handshake, OutputMode),
    handshake: Handshake,
    output: OutputMode,
    mode: FlowState,
    xoff_sent: bool,
    pending_ack: bool,
    online: bool,
    logical_buffer: Option<usize>,
    switches: u16,
    intercharacter_delay: u16,
    error: Option<DeviceError>,
}

impl Default for Interceptor {
    fn default() -> Self {
        Self::new(Handshake::default(), OutputMode::default())
    }
}

impl Interceptor {
    pub fn new(handshake: Handshake, output: OutputMode) -> Self {
        Self {
            device: DeviceControl::new(),
            defaults: (handshake.clone(), output.clone()),
            handshake,
            output,
            mode: FlowState::Plain,
            xoff_sent: false,
            pending_ack: false,
            online: true,
            logical_buffer: None,
            switches: 0,
            intercharacter_delay: 0,
            error: None,
        }
    }

    /// Back to the configuration the interceptor was created with.
    pub fn reset(&mut self) {
        let (handshake, output) = self.defaults.clone();
        *self = Self::new(handshake, output);
    }

    pub fn state(&self) -> FlowState {
        if self.device.is_active() {
            FlowState::Escape
        } else {
            self.mode
        }
    }

    #[inline]
    pub fn handshake(&self) -> &Handshake {
        &self.handshake
    }

    #[inline]
    pub fn output(&self) -> &OutputMode {
        &self.output
    }

    /// Plotter on line (`ESC . (` / `ESC . )`).
    #[inline]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// XOFF was sent and XON is still owed.
    #[inline]
    pub fn is_throttled(&self) -> bool {
        self.xoff_sent
    }

    #[inline]
    pub fn switches(&self) -> u16 {
        self.switches
    }

    #[inline]
    pub fn intercharacter_delay(&self) -> u16 {
        self.intercharacter_delay
    }

    /// Last device-control error, if any.
    #[inline]
    pub fn error(&self) -> Option<DeviceError> {
        self.error
    }

    pub fn take_error(&mut self) -> Option<DeviceError> {
        self.error.take()
    }

    /// Classify a received byte. Returns `true` when the byte was consumed
    /// here and must not be buffered.
    pub fn intercept<A: Actor>(
        &mut self,
        byte: u8,
        level: BufferLevel,
        actor: &mut A,
    ) -> bool {
        if byte == ControlCode::Cancel.byte() {
            let incomplete = self.device.is_active();
            self.device.reset();
            debug!("[flow] cancel, device control incomplete: {incomplete}");
            actor.cancel(incomplete);
            return true;
        }

        match self.device.advance(byte) {
            Device::Pass => {},
            Device::Consumed => return true,
            Device::Command(command) => {
                if let Err(err) = self.execute(command, level, actor) {
                    self.fail(err, actor);
                }
                return true;
            },
            Device::Error(err) => {
                self.fail(err, actor);
                return true;
            },
        }

        if byte == self.handshake.enquiry && self.mode != FlowState::XonXoff {
            if level.free >= self.handshake.block_size {
                actor.send(&self.handshake.acknowledge);
            } else {
                self.pending_ack = true;
            }
            return true;
        }

        if !self.online {
            return true;
        }

        if level.free == 0 {
            self.fail(DeviceError::BufferOverflow, actor);
            return true;
        }

        let remaining = level.free - 1;
        if self.mode != FlowState::EnqAck
            && !self.xoff_sent
            && remaining < self.handshake.low_water
        {
            debug!("[flow] XOFF, {remaining} bytes free");
            self.xoff_sent = true;
            actor.send(&self.handshake.xoff);
        }

        false
    }

    /// Foreground half: release the sender once the buffer has drained.
    pub fn drain<A: Actor>(&mut self, level: BufferLevel, actor: &mut A) {
        let high_water = self.handshake.high_water.min(level.capacity);
        if self.xoff_sent
            && (level.free >= high_water || self.mode == FlowState::EnqAck)
        {
            debug!("[flow] XON, {} bytes free", level.free);
            self.xoff_sent = false;
            actor.send(&self.handshake.xon);
        }

        if self.pending_ack && level.free >= self.handshake.block_size {
            self.pending_ack = false;
            actor.send(&self.handshake.acknowledge);
        }
    }

    /// Free space as reported to the host.
    pub fn available(&self, level: BufferLevel) -> usize {
        match self.logical_buffer {
            Some(size) => size.saturating_sub(level.count).min(level.free),
            None => level.free,
        }
    }

    pub fn buffer_size(&self, level: BufferLevel) -> usize {
        self.logical_buffer.unwrap_or(level.capacity)
    }

    pub fn extended_status(&self, level: BufferLevel) -> ExtendedStatus {
        let mut status = ExtendedStatus::empty();
        status.set(ExtendedStatus::BUFFER_EMPTY, level.count == 0);
        status.set(ExtendedStatus::READY, self.online);
        status
    }

    fn execute<A: Actor>(
        &mut self,
        command: DeviceCommand,
        level: BufferLevel,
        actor: &mut A,
    ) -> Result<(), DeviceError> {
        let letter = command.instruction.letter() as char;
        debug!("[flow] ESC.{letter} {:?}", command.params());
        match command.instruction {
            Instruction::Configure => {
                if let Some(size) = command.param(0).filter(|size| *size > 0) {
                    let size = (size as usize).min(level.capacity);
                    self.logical_buffer = Some(size);
                }
                if let Some(switches) = command.param(1) {
                    self.switches = switches;
                }
            },
            Instruction::BufferSpace => self.reply(self.available(level), actor),
            Instruction::ExtendedError => {
                let code = self.error.take().map_or(0, DeviceError::code);
                self.reply(code, actor);
            },
            Instruction::Handshake1 | Instruction::Handshake2 => {
                self.configure_handshake(command)?
            },
            Instruction::AbortDeviceControl => self.pending_ack = false,
            Instruction::AbortGraphics => actor.abort_graphics(),
            Instruction::BufferSize => {
                self.reply(self.buffer_size(level), actor)
            },
            Instruction::OutputMode => self.configure_output(command)?,
            Instruction::ExtendedOutput => {
                let xoff = chars(&command, 1..command.len())?;
                self.intercharacter_delay = command.param(0).unwrap_or(0);
                if !xoff.is_empty() {
                    self.handshake.xoff = xoff;
                    self.mode = FlowState::XonXoff;
                }
            },
            Instruction::ExtendedStatus => {
                self.reply(self.extended_status(level).bits(), actor)
            },
            Instruction::Reset => {
                let (handshake, output) = self.defaults.clone();
                self.handshake = handshake;
                self.output = output;
                self.mode = FlowState::Plain;
                self.pending_ack = false;
                self.logical_buffer = None;
            },
            Instruction::PlotterOn => self.online = true,
            Instruction::PlotterOff => self.online = false,
        }

        Ok(())
    }

    fn configure_handshake(
        &mut self,
        command: DeviceCommand,
    ) -> Result<(), DeviceError> {
        let block = command.param(0).filter(|block| *block > 0);
        let enquiry = char_param(&command, 1)?.filter(|enquiry| *enquiry != 0);
        let chars = chars(&command, 2..command.len())?;

        if let Some(enquiry) = enquiry {
            self.handshake.enquiry = enquiry;
            if !chars.is_empty() {
                self.handshake.acknowledge = chars;
            }
            if let Some(block) = block {
                self.handshake.block_size = block as usize;
            }
            self.mode = FlowState::EnqAck;
        } else if command.instruction == Instruction::Handshake2
            && !chars.is_empty()
        {
            self.handshake.xon = chars;
            if let Some(block) = block {
                self.handshake.low_water = block as usize;
            }
            self.mode = FlowState::XonXoff;
        } else if let Some(block) = block {
            self.handshake.block_size = block as usize;
        }

        Ok(())
    }

    fn configure_output(
        &mut self,
        command: DeviceCommand,
    ) -> Result<(), DeviceError> {
        let trigger = char_param(&command, 1)?;
        let echo_terminate = char_param(&command, 2)?;
        let terminator = chars(&command, 3..5)?;
        let initiator = char_param(&command, 5)?;

        self.output.turnaround_delay = command.param(0).unwrap_or(0);
        self.output.trigger = trigger.filter(|c| *c != 0);
        self.output.echo_terminate = echo_terminate.filter(|c| *c != 0);
        self.output.initiator = initiator.filter(|c| *c != 0);

        self.output.terminator = if terminator.is_empty() {
            self.defaults.1.terminator.clone()
        } else {
            terminator
        };

        Ok(())
    }

    fn reply<A: Actor>(&self, value: impl ToString, actor: &mut A) {
        actor.send(&self.output.frame(value.to_string().as_bytes()));
    }

    fn fail<A: Actor>(&mut self, err: DeviceError, actor: &mut A) {
        debug!("[flow] device-control error {}: {err}", err.code());
        self.error = Some(err);
        actor.device_error(err);
    }
}

fn char_param(
    command: &DeviceCommand,
    idx: usize,
) -> Result<Option<u8>, DeviceError> {
    command
        .param(idx)
        .map(|value| u8::try_from(value).map_err(|_| DeviceError::OutOfRange))
        .transpose()
}

/// Non-zero character parameters in `range`.
fn chars(
    command: &DeviceCommand,
    range: Range<usize>,
) -> Result<Vec<u8>, DeviceError> {
    let mut chars = Vec::new();
    for idx in range {
        match char_param(command, idx)? {
            Some(0) | None => {},
            Some(c) => chars.push(c),
        }
    }
    Ok(chars)
}
