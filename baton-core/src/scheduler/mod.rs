//! Command scheduler
//!
//! Arbitrates subsystem ownership between commands and steps the running
//! set once per control-loop tick.

pub mod executor;
pub mod report;

pub use executor::{Scheduled, ScheduleError, Scheduler, MAX_BINDINGS, MAX_COMMANDS};
pub use report::{CommandFault, FaultPhase, TickReport, FAULT_LOG_LEN, MAX_TICK_FAULTS};
