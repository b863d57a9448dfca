//! Baton Hardware Abstraction Layer
//!
//! This crate defines the hardware traits consumed by subsystems and
//! triggers. Chip-specific crates implement them, so the scheduler and the
//! robot wiring run unchanged on a controller board or in host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (baton-robot, firmware)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  baton-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  baton-hal-   │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`motor::MotorOutput`] - Signed duty output to a motor controller
//! - [`gpio::DigitalOutput`] - Digital outputs (solenoid valves, LEDs)
//! - [`input::ButtonInput`], [`input::AxisInput`] - Operator controls
//! - [`input::ModeSource`] - Enable/autonomous control word

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod input;
pub mod motor;

// Re-export key traits at crate root for convenience
pub use gpio::DigitalOutput;
pub use input::{AxisInput, ButtonInput, ControlWord, ModeSource};
pub use motor::MotorOutput;
