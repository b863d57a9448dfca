//! Commands
//!
//! A command is a unit of behavior with declared subsystem requirements and
//! an initialize / execute / is_finished / end lifecycle. Commands receive
//! the application context on every callback instead of holding references
//! to the subsystems they drive.

pub mod basic;
pub mod decorate;
pub mod group;
pub mod wait;

pub use basic::FunctionalCommand;
pub use decorate::CommandExt;
pub use group::{Child, CompositionError, DeadlineGroup, ParallelGroup, RaceGroup, SequentialGroup};
pub use wait::{ticks_for_millis, WaitTicks, WaitUntil};

use crate::subsystem::Requirements;

/// Handle to a command registered with the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CommandId(u16);

impl CommandId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index as u16)
    }

    /// Registration index
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle state of a registered command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandState {
    /// Never scheduled
    #[default]
    Idle,
    /// Accepted by arbitration, initialize not yet complete
    Scheduled,
    /// Holding its requirements and executing every tick
    Running,
    /// Last scheduling episode has ended
    Ended,
}

impl CommandState {
    /// Check if the command currently holds its requirements
    pub fn is_active(&self) -> bool {
        matches!(self, CommandState::Scheduled | CommandState::Running)
    }
}

/// Unrecoverable fault reported by a command callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Hardware output could not be driven
    #[error("hardware output fault")]
    Hardware,
    /// Sensor reading missing or out of range
    #[error("sensor reading unavailable")]
    Sensor,
    /// Command started in a state it cannot handle
    #[error("precondition failed: {0}")]
    Precondition(&'static str),
}

/// Capability of a schedulable behavior
///
/// The scheduler guarantees that for every scheduling episode `initialize`
/// runs once, `execute` and `is_finished` run once per tick while the
/// command is running, and exactly one `end` call closes the episode.
pub trait Command<C> {
    /// Name for logging
    fn name(&self) -> &'static str {
        "command"
    }

    /// Subsystems this command needs exclusive access to
    ///
    /// Must not change while the command is registered.
    fn requirements(&self) -> Requirements;

    /// Called once when the command is scheduled
    fn initialize(&mut self, _ctx: &mut C) -> Result<(), CommandError> {
        Ok(())
    }

    /// Called once per tick while running
    fn execute(&mut self, _ctx: &mut C) -> Result<(), CommandError> {
        Ok(())
    }

    /// Polled after every `execute`; `true` ends the command normally
    fn is_finished(&self, _ctx: &C) -> bool {
        false
    }

    /// Called once when the episode ends
    ///
    /// `interrupted` is `true` when the command was cancelled, displaced by
    /// a conflicting command, or faulted.
    fn end(&mut self, _ctx: &mut C, _interrupted: bool) {}

    /// Whether a conflicting command may displace this one
    fn interruptible(&self) -> bool {
        true
    }
}

impl<C> Command<C> for alloc::boxed::Box<dyn Command<C>> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn requirements(&self) -> Requirements {
        (**self).requirements()
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        (**self).initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        (**self).execute(ctx)
    }

    fn is_finished(&self, ctx: &C) -> bool {
        (**self).is_finished(ctx)
    }

    fn end(&mut self, ctx: &mut C, interrupted: bool) {
        (**self).end(ctx, interrupted)
    }

    fn interruptible(&self) -> bool {
        (**self).interruptible()
    }
}
