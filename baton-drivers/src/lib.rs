//! Driver implementations
//!
//! This crate builds robot-level actuators and operator helpers on top of
//! the traits in baton-hal:
//!
//! - Motor groups (voltage control, inversion, slew limiting)
//! - Pneumatic solenoids (single and double acting)
//! - Gamepad shaping (deadband, arcade mixing)
//! - Operator station link (status frames, shared input state)

#![no_std]
#![deny(unsafe_code)]

pub mod gamepad;
pub mod motor;
pub mod pneumatic;
pub mod station;

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Motor group has no room for another channel
    #[error("motor group is full")]
    GroupFull,
    /// Nominal voltage must be positive
    #[error("invalid nominal voltage")]
    InvalidVoltage,
}
