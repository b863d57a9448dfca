//! Gamepad shaping
//!
//! Raw stick values are noisy around center and exceed the drivetrain's
//! range when combined. These helpers turn axis readings into wheel duties.

use baton_hal::{AxisInput, ButtonInput};

/// Axis and button indices of an Xbox-style controller
pub mod xbox {
    pub const LEFT_X: u8 = 0;
    pub const LEFT_Y: u8 = 1;
    pub const LEFT_TRIGGER: u8 = 2;
    pub const RIGHT_TRIGGER: u8 = 3;
    pub const RIGHT_X: u8 = 4;
    pub const RIGHT_Y: u8 = 5;

    pub const A: u8 = 1;
    pub const B: u8 = 2;
    pub const X: u8 = 3;
    pub const Y: u8 = 4;
    pub const LEFT_BUMPER: u8 = 5;
    pub const RIGHT_BUMPER: u8 = 6;
    pub const BACK: u8 = 7;
    pub const START: u8 = 8;
}

fn magnitude(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}

/// Zero values inside `band` and rescale the rest to `[-1.0, 1.0]`
///
/// NaN reads as zero.
pub fn deadband(value: f32, band: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    let value = value.clamp(-1.0, 1.0);
    let band = band.clamp(0.0, 0.99);
    if magnitude(value) <= band {
        return 0.0;
    }
    let scaled = (magnitude(value) - band) / (1.0 - band);
    if value < 0.0 {
        -scaled
    } else {
        scaled
    }
}

/// Square a value keeping its sign, for finer control near center
pub fn square_keep_sign(value: f32) -> f32 {
    value * magnitude(value)
}

/// Left and right wheel duties
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WheelDuties {
    pub left: f32,
    pub right: f32,
}

/// Mix a throttle and a turn rate into wheel duties
///
/// Outputs are scaled down together when either side would exceed 1.0, so
/// the turn ratio is kept at full throttle.
pub fn arcade(throttle: f32, turn: f32) -> WheelDuties {
    let left = throttle + turn;
    let right = throttle - turn;
    let peak = magnitude(left).max(magnitude(right));
    if peak > 1.0 {
        WheelDuties {
            left: left / peak,
            right: right / peak,
        }
    } else {
        WheelDuties { left, right }
    }
}

/// Operator device with axis shaping applied
pub struct Gamepad<D> {
    device: D,
    deadband: f32,
}

impl<D> Gamepad<D> {
    /// Wrap a device with the given stick deadband
    pub fn new(device: D, deadband: f32) -> Self {
        Self { device, deadband }
    }

    /// Access the raw device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the raw device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

impl<D: AxisInput> Gamepad<D> {
    /// Axis value with the deadband applied
    pub fn axis(&self, index: u8) -> f32 {
        deadband(self.device.axis(index), self.deadband)
    }
}

impl<D: ButtonInput> ButtonInput for Gamepad<D> {
    fn button_count(&self) -> u8 {
        self.device.button_count()
    }

    fn button(&self, port: u8) -> bool {
        self.device.button(port)
    }
}
