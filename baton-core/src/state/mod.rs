//! Robot mode state machine
//!
//! The outer program state is driven by the field's mode signal. It is
//! explicit, finite and total: every (mode, event) pair has a defined
//! successor.

pub mod events;
pub mod machine;

pub use events::ModeEvent;
pub use machine::RobotMode;
