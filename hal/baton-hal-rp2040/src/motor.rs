//! Servo-pulse motor controller outputs
//!
//! Competition motor controllers take a hobby-servo style pulse: 1500 µs
//! is neutral, 1000 µs full reverse and 2000 µs full forward, repeated
//! every 20 ms.
//!
//! Each RP2040 PWM slice drives two channels, so a slice split into its A
//! and B outputs feeds two controllers.

use baton_hal::motor::{clamp_duty, MotorOutput};
use embassy_rp::pwm::Config as PwmConfig;
use embedded_hal::pwm::SetDutyCycle;

/// Pulse repetition period in microseconds
pub const PERIOD_US: u16 = 20_000;

/// Neutral pulse width in microseconds
pub const NEUTRAL_US: u16 = 1_500;

/// Pulse width change from neutral to full scale in microseconds
pub const RANGE_US: u16 = 500;

/// PWM slice configuration for 1 µs counts and a 20 ms period
///
/// Assumes the default 125 MHz system clock. Both channels start at
/// neutral so controllers see a valid signal from power up.
pub fn servo_config() -> PwmConfig {
    let mut config = PwmConfig::default();
    config.divider = 125u8.into();
    config.top = PERIOD_US - 1;
    config.compare_a = NEUTRAL_US;
    config.compare_b = NEUTRAL_US;
    config
}

/// Pulse width for a signed duty
pub fn pulse_width_us(duty: f32) -> u16 {
    let offset = clamp_duty(duty) * f32::from(RANGE_US);
    // Round half away from zero without libm
    let offset = if offset < 0.0 { offset - 0.5 } else { offset + 0.5 } as i32;
    (i32::from(NEUTRAL_US) + offset) as u16
}

/// One motor controller on a PWM channel
pub struct ServoMotor<P> {
    output: P,
    duty: f32,
}

impl<P: SetDutyCycle> ServoMotor<P> {
    /// Take a PWM channel and drive it to neutral
    pub fn new(output: P) -> Self {
        let mut motor = Self { output, duty: 0.0 };
        motor.write(0.0);
        motor
    }

    /// Release the PWM channel
    pub fn free(self) -> P {
        self.output
    }

    fn write(&mut self, duty: f32) {
        // RP2040 PWM writes cannot fail
        let _ = self
            .output
            .set_duty_cycle_fraction(pulse_width_us(duty), PERIOD_US);
    }
}

impl<P: SetDutyCycle> MotorOutput for ServoMotor<P> {
    fn set_duty(&mut self, duty: f32) {
        let duty = clamp_duty(duty);
        self.write(duty);
        self.duty = duty;
    }

    fn duty(&self) -> f32 {
        self.duty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::pwm::ErrorType;

    /// Channel counting in microseconds over one period
    struct Channel {
        compare: u16,
    }

    impl ErrorType for Channel {
        type Error = Infallible;
    }

    impl SetDutyCycle for Channel {
        fn max_duty_cycle(&self) -> u16 {
            PERIOD_US
        }

        fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
            self.compare = duty;
            Ok(())
        }
    }

    #[test]
    fn test_pulse_widths() {
        assert_eq!(pulse_width_us(0.0), 1500);
        assert_eq!(pulse_width_us(1.0), 2000);
        assert_eq!(pulse_width_us(-1.0), 1000);
        assert_eq!(pulse_width_us(0.5), 1750);
        assert_eq!(pulse_width_us(-0.83), 1085);
        assert_eq!(pulse_width_us(3.0), 2000);
        assert_eq!(pulse_width_us(f32::NAN), 1500);
    }

    #[test]
    fn test_new_motor_is_neutral() {
        let motor = ServoMotor::new(Channel { compare: 0 });
        assert_eq!(motor.duty(), 0.0);
        assert_eq!(motor.free().compare, 1500);
    }

    #[test]
    fn test_set_duty_writes_pulse() {
        let mut motor = ServoMotor::new(Channel { compare: 0 });
        motor.set_duty(-2.0);
        assert_eq!(motor.duty(), -1.0);
        assert!(motor.is_running());

        motor.stop();
        assert!(!motor.is_running());
        assert_eq!(motor.free().compare, 1500);
    }
}
