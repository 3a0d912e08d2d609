//! HP-GL plotter emulation for motion controllers.
//!
//! This crate ties together the building blocks of the workspace:
//! - [`motori_scan`] splits the byte stream into HP-GL instructions,
//! - [`motori_geom`] converts user units to plotter steps and breaks arcs
//!   and labels into straight moves,
//! - [`motori_escape`] handles flow control and `ESC .` device control on
//!   the receive path.
//!
//! Hosts implement the [`Motion`], [`Stream`] and [`Accessory`] traits and
//! drive a [`Plotter`]:
//! 1. call [`Plotter::start`] once the serial stream is handed over,
//! 2. route every received byte through [`Plotter::intercept`] and buffer it
//!    only when that returns `false`,
//! 3. call [`Plotter::poll`] from the main loop while
//!    [`Plotter::is_active`] holds.

mod error;
mod host;
mod options;
mod plan;
mod plotter;
mod state;
mod timeout;

pub mod hooks;
pub mod report;

#[cfg(test)]
mod fake;

pub use error::{HpglError, PlotterError, Result};
pub use host::{Accessory, Host, HostState, Motion, Stream};
pub use options::{Paper, PlotterOptions};
pub use plotter::{BANNER, Plotter, Process};
pub use state::{Attributes, ErrorState, LineType, PenStatus, PlotterState};
pub use timeout::{StdTimeout, Timeout};

pub use motori_escape as escape;
pub use motori_geom as geom;
pub use motori_scan as scan;
