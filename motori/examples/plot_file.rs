//! Plot an HP-GL file on a simulated machine.
//!
//! Bytes of the file go through the receive path exactly as a serial port
//! would deliver them, and every move the plotter queues is printed as a
//! G-code line. Run it with:
//!
//! ```bash
//! cargo run -p motori --example plot_file -- <path> [options.json]
//! ```
//!
//! The options file may be partial; missing fields keep their defaults.

use std::{
    collections::VecDeque,
    env, fs,
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use env_logger::Env;
use motori::{
    Accessory, HostState, Motion, Plotter, PlotterOptions, Stream, geom::Point,
};

/// Receive buffer size of the simulated board.
const RX_CAPACITY: usize = 1024;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut args = env::args().skip(1);
    let path = PathBuf::from(
        args.next().context("usage: plot_file <path> [options.json]")?,
    );
    let options = match args.next() {
        Some(config) => {
            let json = fs::read_to_string(&config)
                .with_context(|| format!("failed to read {config}"))?;
            PlotterOptions::from_json(&json)
                .with_context(|| format!("failed to parse {config}"))?
        },
        None => PlotterOptions::default(),
    };
    let input = fs::read(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let mut plotter: Plotter<Machine> =
        Plotter::new(Machine::default(), options);
    plotter.start().context("failed to start the plotter")?;

    let mut input = input.into_iter().peekable();
    while plotter.is_active() {
        // Feed the receive buffer like an interrupt handler would.
        while plotter.host().rx.len() < RX_CAPACITY {
            let Some(byte) = input.next() else {
                break;
            };
            if !plotter.intercept(byte) {
                plotter.host_mut().rx.push_back(byte);
            }
        }

        plotter.poll()?;

        let drained = input.peek().is_none() && plotter.host().rx.is_empty();
        if drained && plotter.is_idle() {
            break;
        }
    }

    let machine = plotter.into_host();
    println!(
        "; {} moves, {} pen changes",
        machine.moves, machine.pen_changes
    );
    Ok(())
}

/// Machine that prints G-code instead of moving.
#[derive(Default)]
struct Machine {
    rx: VecDeque<u8>,
    position: Point,
    moves: usize,
    pen_changes: usize,
}

impl Motion for Machine {
    fn move_to(&mut self, target: Point, rapid: bool, feed_rate: f32) -> bool {
        let code = if rapid { "G0" } else { "G1" };
        println!("{code} X{:.3} Y{:.3} F{feed_rate:.0}", target.x, target.y);
        self.position = target;
        self.moves += 1;
        true
    }

    fn synchronize(&mut self) {
        println!("M400");
    }

    fn current_position(&self) -> Point {
        self.position
    }

    fn set_pen(&mut self, down: bool) {
        println!("{}", if down { "M3" } else { "M5" });
        self.pen_changes += 1;
    }

    fn home(&mut self) -> bool {
        println!("$H");
        self.position = Point::ORIGIN;
        true
    }

    fn state(&self) -> HostState {
        HostState::Idle
    }
}

impl Stream for Machine {
    fn read(&mut self) -> Option<u8> {
        self.rx.pop_front()
    }

    fn write(&mut self, bytes: &[u8]) {
        let mut stdout = io::stdout();
        // Replies share stdout with the G-code.
        let _ = stdout.write_all(bytes);
    }

    fn rx_free(&self) -> usize {
        RX_CAPACITY - self.rx.len()
    }

    fn rx_count(&self) -> usize {
        self.rx.len()
    }

    fn rx_capacity(&self) -> usize {
        RX_CAPACITY
    }

    fn flush_rx(&mut self) {
        self.rx.clear();
    }
}

impl Accessory for Machine {
    fn select_pen(&mut self, pen: u8) {
        println!("T{pen}");
    }
}
