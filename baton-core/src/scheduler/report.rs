//! Per-tick results and fault records

use heapless::Vec;

use crate::command::{CommandError, CommandId};

/// Faults kept in a single tick report
pub const MAX_TICK_FAULTS: usize = 4;

/// Faults kept in the scheduler's rolling log
pub const FAULT_LOG_LEN: usize = 8;

/// Lifecycle callback that reported a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultPhase {
    Initialize,
    Execute,
}

/// A command callback that returned an error
///
/// By the time a fault is recorded the command has already been ended
/// (interrupted) and its subsystems released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandFault {
    pub command: CommandId,
    pub phase: FaultPhase,
    pub error: CommandError,
}

/// Summary of one scheduler tick
///
/// Lifecycle changes made between two ticks (for example by a mode change)
/// are counted in the report of the following tick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickReport {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Commands that completed `initialize`
    pub started: u16,
    /// Commands that ran `end`
    pub ended: u16,
    /// Faults recorded this tick
    pub faults: Vec<CommandFault, MAX_TICK_FAULTS>,
    /// Faults that did not fit in `faults`
    pub dropped_faults: u16,
}

impl TickReport {
    /// Check if any command faulted this tick
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty() || self.dropped_faults > 0
    }

    pub(crate) fn record(&mut self, fault: CommandFault) {
        if self.faults.push(fault).is_err() {
            self.dropped_faults = self.dropped_faults.saturating_add(1);
        }
    }
}
