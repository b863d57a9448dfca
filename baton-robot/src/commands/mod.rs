//! Robot commands
//!
//! Builders for every command the robot binds or runs in autonomous. Each
//! call returns a fresh instance, so the same behavior can be bound to
//! several buttons without the bindings sharing lifecycle state.

pub mod auto;
pub mod teleop;

use crate::context::RobotContext;

/// Context every robot command runs against
pub type Ctx<H> = RobotContext<H>;
