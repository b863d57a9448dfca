//! Motor output abstraction
//!
//! A motor output is a single speed-controller channel. Commands are a
//! signed duty in `[-1.0, 1.0]`; the sign selects direction. Writes are
//! fire-and-forget and never block.

/// Signed duty output to one motor controller channel
pub trait MotorOutput {
    /// Apply a duty cycle in `[-1.0, 1.0]`
    ///
    /// Implementations clamp out-of-range values.
    fn set_duty(&mut self, duty: f32);

    /// Last duty applied
    fn duty(&self) -> f32;

    /// Stop driving the motor (coast)
    fn stop(&mut self) {
        self.set_duty(0.0);
    }

    /// Check if the output is currently non-zero
    fn is_running(&self) -> bool {
        self.duty() != 0.0
    }
}

/// Clamp a requested duty into the valid output range
///
/// NaN maps to zero so a bad computation never drives a motor.
pub fn clamp_duty(duty: f32) -> f32 {
    if duty.is_nan() {
        0.0
    } else {
        duty.clamp(-1.0, 1.0)
    }
}
