//! Waiting commands
//!
//! Timeouts are not a scheduler feature. A deadline is a command that counts
//! ticks, raced against the work it bounds (see
//! [`CommandExt::with_timeout`](super::CommandExt::with_timeout)).

use alloc::boxed::Box;

use super::{Command, CommandError};
use crate::subsystem::Requirements;

/// Finishes after a fixed number of executed ticks
#[derive(Debug, Clone)]
pub struct WaitTicks {
    ticks: u32,
    elapsed: u32,
}

impl WaitTicks {
    /// Wait for `ticks` scheduler ticks
    pub const fn new(ticks: u32) -> Self {
        Self { ticks, elapsed: 0 }
    }

    /// Wait for at least `ms` milliseconds at the given tick period
    pub fn millis(ms: u32, period_ms: u32) -> Self {
        Self::new(ticks_for_millis(ms, period_ms))
    }

    /// Ticks executed in the current episode
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }
}

impl<C> Command<C> for WaitTicks {
    fn name(&self) -> &'static str {
        "wait"
    }

    fn requirements(&self) -> Requirements {
        Requirements::none()
    }

    fn initialize(&mut self, _ctx: &mut C) -> Result<(), CommandError> {
        self.elapsed = 0;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut C) -> Result<(), CommandError> {
        self.elapsed = self.elapsed.saturating_add(1);
        Ok(())
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.elapsed >= self.ticks
    }
}

/// Finishes once a condition on the context holds
pub struct WaitUntil<C> {
    condition: Box<dyn Fn(&C) -> bool>,
}

impl<C> WaitUntil<C> {
    /// Wait until `condition` returns true
    pub fn new<F>(condition: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Self {
            condition: Box::new(condition),
        }
    }
}

impl<C> Command<C> for WaitUntil<C> {
    fn name(&self) -> &'static str {
        "wait_until"
    }

    fn requirements(&self) -> Requirements {
        Requirements::none()
    }

    fn is_finished(&self, ctx: &C) -> bool {
        (self.condition)(ctx)
    }
}

/// Convert a duration to whole ticks, rounding up
///
/// A zero period is treated as one millisecond.
pub fn ticks_for_millis(ms: u32, period_ms: u32) -> u32 {
    let period = period_ms.max(1);
    ms.div_ceil(period)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_ticks_counts_executes() {
        let mut wait = WaitTicks::new(3);
        let mut ctx = ();

        Command::<()>::initialize(&mut wait, &mut ctx).unwrap();
        for _ in 0..2 {
            Command::<()>::execute(&mut wait, &mut ctx).unwrap();
            assert!(!Command::<()>::is_finished(&wait, &ctx));
        }
        Command::<()>::execute(&mut wait, &mut ctx).unwrap();
        assert!(Command::<()>::is_finished(&wait, &ctx));
    }

    #[test]
    fn test_wait_ticks_resets_on_initialize() {
        let mut wait = WaitTicks::new(1);
        let mut ctx = ();

        Command::<()>::execute(&mut wait, &mut ctx).unwrap();
        assert_eq!(wait.elapsed(), 1);
        Command::<()>::initialize(&mut wait, &mut ctx).unwrap();
        assert_eq!(wait.elapsed(), 0);
    }

    #[test]
    fn test_ticks_for_millis() {
        assert_eq!(ticks_for_millis(1000, 20), 50);
        assert_eq!(ticks_for_millis(1010, 20), 51);
        assert_eq!(ticks_for_millis(0, 20), 0);
        assert_eq!(ticks_for_millis(5, 0), 5);
    }

    #[test]
    fn test_wait_until() {
        let wait = WaitUntil::new(|level: &u8| *level > 2);
        assert!(!wait.is_finished(&1));
        assert!(wait.is_finished(&3));
    }
}
