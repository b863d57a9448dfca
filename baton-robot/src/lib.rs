//! Competition robot built on the Baton scheduler
//!
//! Five subsystems (drive, climber, intake, shooter, arm), the commands
//! that drive them, the operator bindings and a timed autonomous routine.
//! Hardware is reached only through the [`hardware::Hardware`] factory, so
//! the whole robot runs in host tests against mock devices.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod commands;
pub mod config;
pub mod container;
pub mod context;
pub mod hardware;
pub mod robot;
pub mod subsystems;

#[cfg(test)]
mod mock;

pub use config::{parse_config, ConfigError, RobotConfig, DEFAULT_CONFIG};
pub use container::Container;
pub use context::RobotContext;
pub use hardware::{Hardware, HardwareError, PortBank};
pub use robot::Robot;
pub use subsystems::{Mechanism, MechanismIds};

use baton_core::ScheduleError;
use baton_drivers::DriverError;

/// Errors raised while bringing the robot up
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RobotError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("hardware: {0}")]
    Hardware(#[from] HardwareError),
    #[error("driver: {0}")]
    Driver(#[from] DriverError),
    #[error("scheduler: {0}")]
    Schedule(#[from] ScheduleError),
    /// Internal wiring invariant broken
    #[error("wiring: {0}")]
    Wiring(&'static str),
}
