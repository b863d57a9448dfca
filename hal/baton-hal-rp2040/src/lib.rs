//! RP2040-specific HAL for Baton robot controllers
//!
//! This crate provides RP2040 implementations of the baton-hal traits:
//! - Servo-pulse motor controller outputs on PWM slices
//! - Solenoid valve outputs on GPIO

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod motor;

pub use gpio::PinOutput;
pub use motor::{pulse_width_us, servo_config, ServoMotor};
