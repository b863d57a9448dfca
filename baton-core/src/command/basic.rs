//! Closure-backed commands
//!
//! Most robot commands are a couple of subsystem calls. [`FunctionalCommand`]
//! builds them from closures instead of a dedicated type per behavior.
//!
//! ```ignore
//! // Spin the shooter while held, stop it on release
//! let shoot = FunctionalCommand::start_end(
//!     "shoot",
//!     Requirements::of(shooter_id),
//!     |robot: &mut Robot| robot.shooter.run(),
//!     |robot: &mut Robot| robot.shooter.stop(),
//! );
//! ```

use alloc::boxed::Box;

use super::{Command, CommandError};
use crate::subsystem::Requirements;

type Action<C> = Box<dyn FnMut(&mut C) -> Result<(), CommandError>>;
type EndAction<C> = Box<dyn FnMut(&mut C, bool)>;
type Condition<C> = Box<dyn Fn(&C) -> bool>;

/// Command assembled from closures
pub struct FunctionalCommand<C> {
    name: &'static str,
    requirements: Requirements,
    on_init: Option<Action<C>>,
    on_execute: Option<Action<C>>,
    on_end: Option<EndAction<C>>,
    finished: Option<Condition<C>>,
    /// Finish right after initialize
    instant: bool,
    interruptible: bool,
}

impl<C> FunctionalCommand<C> {
    /// Create a command that does nothing and never finishes
    pub fn new(name: &'static str, requirements: Requirements) -> Self {
        Self {
            name,
            requirements,
            on_init: None,
            on_execute: None,
            on_end: None,
            finished: None,
            instant: false,
            interruptible: true,
        }
    }

    /// Command that runs `action` once on initialize and finishes
    pub fn instant<F>(name: &'static str, requirements: Requirements, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<(), CommandError> + 'static,
    {
        let mut cmd = Self::new(name, requirements).on_init(action);
        cmd.instant = true;
        cmd
    }

    /// Command that runs `action` every tick until interrupted
    pub fn run<F>(name: &'static str, requirements: Requirements, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<(), CommandError> + 'static,
    {
        Self::new(name, requirements).on_execute(action)
    }

    /// Command that runs `start` on initialize and `stop` on end
    pub fn start_end<S, E>(name: &'static str, requirements: Requirements, start: S, stop: E) -> Self
    where
        S: FnMut(&mut C) -> Result<(), CommandError> + 'static,
        E: FnMut(&mut C) + 'static,
    {
        let mut stop = stop;
        Self::new(name, requirements)
            .on_init(start)
            .on_end(move |ctx, _| stop(ctx))
    }

    /// Set the initialize action
    pub fn on_init<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<(), CommandError> + 'static,
    {
        self.on_init = Some(Box::new(action));
        self
    }

    /// Set the per-tick action
    pub fn on_execute<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut C) -> Result<(), CommandError> + 'static,
    {
        self.on_execute = Some(Box::new(action));
        self
    }

    /// Set the end action; receives the `interrupted` flag
    pub fn on_end<F>(mut self, action: F) -> Self
    where
        F: FnMut(&mut C, bool) + 'static,
    {
        self.on_end = Some(Box::new(action));
        self
    }

    /// Set the finish condition
    pub fn finish_when<F>(mut self, condition: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.finished = Some(Box::new(condition));
        self
    }

    /// Refuse displacement by conflicting commands
    pub fn non_interruptible(mut self) -> Self {
        self.interruptible = false;
        self
    }
}

impl<C> Command<C> for FunctionalCommand<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        match self.on_init.as_mut() {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        match self.on_execute.as_mut() {
            Some(action) => action(ctx),
            None => Ok(()),
        }
    }

    fn is_finished(&self, ctx: &C) -> bool {
        self.instant || self.finished.as_ref().is_some_and(|done| done(ctx))
    }

    fn end(&mut self, ctx: &mut C, interrupted: bool) {
        if let Some(action) = self.on_end.as_mut() {
            action(ctx, interrupted);
        }
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }
}
