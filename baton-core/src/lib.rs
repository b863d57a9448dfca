//! Board-agnostic command scheduling for robot controllers
//!
//! This crate contains the coordination model that the robot wiring is
//! built on, with no dependency on specific hardware:
//!
//! - Subsystem and command capability traits
//! - Trigger edge detection and button bindings
//! - Command groups (sequence, parallel, race, deadline) and decorators
//! - The scheduler that arbitrates subsystem ownership once per tick
//! - The robot mode state machine (disabled, teleop, autonomous)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod command;
pub mod scheduler;
pub mod state;
pub mod subsystem;
pub mod trigger;

pub use command::{Command, CommandError, CommandExt, CommandId, CommandState};
pub use scheduler::{Scheduled, ScheduleError, Scheduler, TickReport};
pub use state::{ModeEvent, RobotMode};
pub use subsystem::{Requirements, Subsystem, SubsystemId, Subsystems};
pub use trigger::{BindingKind, Edge, Trigger};
