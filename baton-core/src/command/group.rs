//! Command groups
//!
//! Groups are commands built from child commands. A group requires the
//! union of its children's requirements for its whole lifetime, so no other
//! command can take a subsystem between two children of a sequence.
//!
//! - [`SequentialGroup`]: children one at a time, in order
//! - [`ParallelGroup`]: children together, done when all are done
//! - [`RaceGroup`]: children together, done when any is done
//! - [`DeadlineGroup`]: children together, done when the first is done
//!
//! Children of the concurrent groups must have disjoint requirements.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Command, CommandError};
use crate::subsystem::Requirements;

/// Boxed child command
pub type Child<C> = Box<dyn Command<C>>;

/// Errors building a command group
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CompositionError {
    /// Two concurrent children require the same subsystem
    #[error("children {first} and {second} share a subsystem")]
    OverlappingRequirements { first: usize, second: usize },
    /// Group needs at least one child
    #[error("group has no children")]
    Empty,
}

fn union_of<C>(children: &[Child<C>]) -> Requirements {
    children
        .iter()
        .fold(Requirements::none(), |acc, c| acc.union(c.requirements()))
}

fn all_interruptible<C>(children: &[Child<C>]) -> bool {
    children.iter().all(|c| c.interruptible())
}

/// Check that no two children share a subsystem
fn check_disjoint<C>(children: &[Child<C>]) -> Result<Requirements, CompositionError> {
    let mut seen = Requirements::none();
    for (i, child) in children.iter().enumerate() {
        let reqs = child.requirements();
        if seen.intersects(reqs) {
            let first = children[..i]
                .iter()
                .position(|c| c.requirements().intersects(reqs))
                .unwrap_or(0);
            return Err(CompositionError::OverlappingRequirements { first, second: i });
        }
        seen = seen.union(reqs);
    }
    Ok(seen)
}

/// Runs children one after another
pub struct SequentialGroup<C> {
    name: &'static str,
    children: Vec<Child<C>>,
    requirements: Requirements,
    interruptible: bool,
    /// Index of the active child; `children.len()` once done
    index: usize,
}

impl<C> SequentialGroup<C> {
    /// Create a sequence; an empty sequence finishes immediately
    pub fn new(children: Vec<Child<C>>) -> Self {
        Self {
            name: "sequence",
            requirements: union_of(&children),
            interruptible: all_interruptible(&children),
            index: children.len(),
            children,
        }
    }

    /// Rename the group for logging
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Index of the child currently running, if any
    pub fn active_index(&self) -> Option<usize> {
        (self.index < self.children.len()).then_some(self.index)
    }
}

impl<C> Command<C> for SequentialGroup<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        self.index = 0;
        match self.children.first_mut() {
            Some(first) => first.initialize(ctx),
            None => Ok(()),
        }
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        let Some(child) = self.children.get_mut(self.index) else {
            return Ok(());
        };

        child.execute(ctx)?;
        if child.is_finished(ctx) {
            child.end(ctx, false);
            self.index += 1;
            if let Some(next) = self.children.get_mut(self.index) {
                next.initialize(ctx)?;
            }
        }
        Ok(())
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.index >= self.children.len()
    }

    fn end(&mut self, ctx: &mut C, interrupted: bool) {
        if interrupted {
            if let Some(child) = self.children.get_mut(self.index) {
                child.end(ctx, true);
            }
        }
        self.index = self.children.len();
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }
}

/// Shared state for groups that run children side by side
struct Concurrent<C> {
    children: Vec<Child<C>>,
    /// Children initialized and not yet ended
    running: Vec<bool>,
}

impl<C> Concurrent<C> {
    fn new(children: Vec<Child<C>>) -> Self {
        let running = alloc::vec![false; children.len()];
        Self { children, running }
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            // Mark before the call so a failing child still gets its end
            *running = true;
            child.initialize(ctx)?;
        }
        Ok(())
    }

    /// Execute all running children; returns which of them reported finished
    fn execute(&mut self, ctx: &mut C, finished: &mut [bool]) -> Result<(), CommandError> {
        for (i, child) in self.children.iter_mut().enumerate() {
            if !self.running[i] {
                continue;
            }
            child.execute(ctx)?;
            finished[i] = child.is_finished(ctx);
        }
        Ok(())
    }

    fn end_child(&mut self, ctx: &mut C, index: usize, interrupted: bool) {
        if self.running[index] {
            self.running[index] = false;
            self.children[index].end(ctx, interrupted);
        }
    }

    fn end_all(&mut self, ctx: &mut C, interrupted: bool) {
        for i in 0..self.children.len() {
            self.end_child(ctx, i, interrupted);
        }
    }

    fn any_running(&self) -> bool {
        self.running.iter().any(|r| *r)
    }
}

/// Runs children together until all have finished
pub struct ParallelGroup<C> {
    name: &'static str,
    inner: Concurrent<C>,
    requirements: Requirements,
    interruptible: bool,
}

impl<C> ParallelGroup<C> {
    /// Create a parallel group; children must not share subsystems
    pub fn new(children: Vec<Child<C>>) -> Result<Self, CompositionError> {
        let requirements = check_disjoint(&children)?;
        Ok(Self {
            name: "parallel",
            interruptible: all_interruptible(&children),
            inner: Concurrent::new(children),
            requirements,
        })
    }

    /// Rename the group for logging
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<C> Command<C> for ParallelGroup<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        self.inner.initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        let mut finished = alloc::vec![false; self.inner.children.len()];
        self.inner.execute(ctx, &mut finished)?;
        for (i, done) in finished.into_iter().enumerate() {
            if done {
                self.inner.end_child(ctx, i, false);
            }
        }
        Ok(())
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        !self.inner.any_running()
    }

    fn end(&mut self, ctx: &mut C, _interrupted: bool) {
        // Children still running at this point did not finish on their own
        self.inner.end_all(ctx, true);
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }
}

/// Runs children together until any one finishes
pub struct RaceGroup<C> {
    name: &'static str,
    inner: Concurrent<C>,
    requirements: Requirements,
    interruptible: bool,
    done: bool,
}

impl<C> RaceGroup<C> {
    /// Create a race; children must not share subsystems
    pub fn new(children: Vec<Child<C>>) -> Result<Self, CompositionError> {
        if children.is_empty() {
            return Err(CompositionError::Empty);
        }
        let requirements = check_disjoint(&children)?;
        Ok(Self::assemble(children, requirements))
    }

    /// Build from children already known to be disjoint
    pub(crate) fn assemble(children: Vec<Child<C>>, requirements: Requirements) -> Self {
        Self {
            name: "race",
            interruptible: all_interruptible(&children),
            inner: Concurrent::new(children),
            requirements,
            done: false,
        }
    }

    /// Rename the group for logging
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<C> Command<C> for RaceGroup<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        self.done = false;
        self.inner.initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        let mut finished = alloc::vec![false; self.inner.children.len()];
        self.inner.execute(ctx, &mut finished)?;
        if finished.iter().any(|f| *f) {
            for (i, done) in finished.into_iter().enumerate() {
                self.inner.end_child(ctx, i, !done);
            }
            self.done = true;
        }
        Ok(())
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.done
    }

    fn end(&mut self, ctx: &mut C, _interrupted: bool) {
        self.inner.end_all(ctx, true);
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }
}

/// Runs children together until the first child (the deadline) finishes
pub struct DeadlineGroup<C> {
    name: &'static str,
    inner: Concurrent<C>,
    requirements: Requirements,
    interruptible: bool,
    done: bool,
}

impl<C> DeadlineGroup<C> {
    /// Create a deadline group; `deadline` bounds the `others`
    pub fn new(deadline: Child<C>, others: Vec<Child<C>>) -> Result<Self, CompositionError> {
        let mut children = Vec::with_capacity(others.len() + 1);
        children.push(deadline);
        children.extend(others);
        let requirements = check_disjoint(&children)?;
        Ok(Self {
            name: "deadline",
            interruptible: all_interruptible(&children),
            inner: Concurrent::new(children),
            requirements,
            done: false,
        })
    }

    /// Rename the group for logging
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<C> Command<C> for DeadlineGroup<C> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        self.done = false;
        self.inner.initialize(ctx)
    }

    fn execute(&mut self, ctx: &mut C) -> Result<(), CommandError> {
        let mut finished = alloc::vec![false; self.inner.children.len()];
        self.inner.execute(ctx, &mut finished)?;
        if finished[0] {
            self.inner.end_child(ctx, 0, false);
            self.inner.end_all(ctx, true);
            self.done = true;
            return Ok(());
        }
        for (i, done) in finished.into_iter().enumerate().skip(1) {
            if done {
                self.inner.end_child(ctx, i, false);
            }
        }
        Ok(())
    }

    fn is_finished(&self, _ctx: &C) -> bool {
        self.done
    }

    fn end(&mut self, ctx: &mut C, _interrupted: bool) {
        self.inner.end_all(ctx, true);
    }

    fn interruptible(&self) -> bool {
        self.interruptible
    }
}
