//! Command decorators
//!
//! Builder-style adapters that wrap a command in a group.

use alloc::boxed::Box;
use alloc::vec;

use super::group::{Child, RaceGroup, SequentialGroup};
use super::wait::{WaitTicks, WaitUntil};
use super::Command;

/// Adapters available on every command
pub trait CommandExt<C: 'static>: Command<C> + Sized + 'static {
    /// Box the command for storage in a group or the scheduler
    fn boxed(self) -> Child<C> {
        Box::new(self)
    }

    /// End the command (interrupted) after `ticks` ticks if it has not
    /// finished on its own
    fn with_timeout(self, ticks: u32) -> RaceGroup<C> {
        let requirements = self.requirements();
        RaceGroup::assemble(vec![self.boxed(), WaitTicks::new(ticks).boxed()], requirements)
            .named("timeout")
    }

    /// End the command (interrupted) once `condition` holds
    fn until<F>(self, condition: F) -> RaceGroup<C>
    where
        F: Fn(&C) -> bool + 'static,
    {
        let requirements = self.requirements();
        RaceGroup::assemble(vec![self.boxed(), WaitUntil::new(condition).boxed()], requirements)
            .named("until")
    }

    /// Run `next` after this command finishes
    fn and_then<N: Command<C> + 'static>(self, next: N) -> SequentialGroup<C> {
        SequentialGroup::new(vec![self.boxed(), Box::new(next)])
    }
}

impl<C: 'static, T: Command<C> + 'static> CommandExt<C> for T {}
