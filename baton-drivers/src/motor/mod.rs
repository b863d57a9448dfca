//! Motor driver implementations
//!
//! - Motor groups: several controller channels driven as one mechanism

pub mod group;

pub use group::{MotorGroup, MotorGroupConfig, MAX_GROUP_SIZE};
