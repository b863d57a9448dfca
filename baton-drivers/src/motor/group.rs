//! Motor group driver
//!
//! Drives several controller channels as one mechanism (a drivetrain side,
//! a two-wheel shooter). Provides:
//! - Voltage requests scaled against a nominal battery voltage
//! - Group-wide inversion for mirrored mechanisms
//! - Optional slew limiting, applied on `update()` once per tick
//!
//! ```ignore
//! let mut shooter = MotorGroup::with_motors(config, [left, right])?;
//! shooter.set_voltage(10.0);
//!
//! // In the subsystem's periodic hook:
//! shooter.update();
//! ```

use baton_hal::motor::{clamp_duty, MotorOutput};
use heapless::Vec;

use crate::DriverError;

/// Maximum channels in one group
pub const MAX_GROUP_SIZE: usize = 4;

/// Motor group configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorGroupConfig {
    /// Negate every output
    pub inverted: bool,
    /// Battery voltage that corresponds to full duty
    pub nominal_voltage: f32,
    /// Largest duty change per update (0 = instant)
    pub max_step: f32,
}

impl Default for MotorGroupConfig {
    fn default() -> Self {
        Self {
            inverted: false,
            nominal_voltage: 12.0,
            max_step: 0.0,
        }
    }
}

/// Channels driven together
pub struct MotorGroup<M> {
    motors: Vec<M, MAX_GROUP_SIZE>,
    config: MotorGroupConfig,
    /// Requested duty, before inversion
    target: f32,
    /// Duty currently applied, before inversion
    output: f32,
}

impl<M: MotorOutput> MotorGroup<M> {
    /// Create an empty group
    pub fn new(config: MotorGroupConfig) -> Result<Self, DriverError> {
        if config.nominal_voltage.is_nan() || config.nominal_voltage <= 0.0 {
            return Err(DriverError::InvalidVoltage);
        }
        Ok(Self {
            motors: Vec::new(),
            config: MotorGroupConfig {
                max_step: if config.max_step > 0.0 { config.max_step } else { 0.0 },
                ..config
            },
            target: 0.0,
            output: 0.0,
        })
    }

    /// Create a group from a set of channels
    pub fn with_motors<I>(config: MotorGroupConfig, motors: I) -> Result<Self, DriverError>
    where
        I: IntoIterator<Item = M>,
    {
        let mut group = Self::new(config)?;
        for motor in motors {
            group.add(motor)?;
        }
        Ok(group)
    }

    /// Add a channel; it starts at the group's current output
    pub fn add(&mut self, mut motor: M) -> Result<(), DriverError> {
        motor.set_duty(self.applied());
        self.motors.push(motor).map_err(|_| DriverError::GroupFull)
    }

    /// Number of channels
    pub fn len(&self) -> usize {
        self.motors.len()
    }

    /// Check if the group has no channels
    pub fn is_empty(&self) -> bool {
        self.motors.is_empty()
    }

    /// Get the configuration
    pub fn config(&self) -> &MotorGroupConfig {
        &self.config
    }

    /// Request a duty in `[-1.0, 1.0]`
    pub fn set_percent(&mut self, percent: f32) {
        self.target = clamp_duty(percent);
        if self.config.max_step == 0.0 {
            self.output = self.target;
            self.write();
        }
    }

    /// Request an output voltage
    ///
    /// Scaled against the nominal voltage, so it is only exact at that
    /// battery level.
    pub fn set_voltage(&mut self, volts: f32) {
        self.set_percent(volts / self.config.nominal_voltage);
    }

    /// Requested duty
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Voltage equivalent of the duty currently applied
    pub fn voltage(&self) -> f32 {
        self.output * self.config.nominal_voltage
    }

    /// Check if the applied duty has reached the request
    pub fn is_at_target(&self) -> bool {
        self.output == self.target
    }

    /// Advance the slew limiter by one tick and write the outputs
    ///
    /// Returns the duty applied (before inversion).
    pub fn update(&mut self) -> f32 {
        if self.config.max_step > 0.0 {
            let step = self.config.max_step;
            let delta = (self.target - self.output).clamp(-step, step);
            self.output = clamp_duty(self.output + delta);
        } else {
            self.output = self.target;
        }
        self.write();
        self.output
    }

    /// Access a channel
    pub fn motor(&self, index: usize) -> Option<&M> {
        self.motors.get(index)
    }

    fn applied(&self) -> f32 {
        if self.config.inverted {
            -self.output
        } else {
            self.output
        }
    }

    fn write(&mut self) {
        let duty = self.applied();
        for motor in self.motors.iter_mut() {
            motor.set_duty(duty);
        }
    }
}

impl<M: MotorOutput> MotorOutput for MotorGroup<M> {
    fn set_duty(&mut self, duty: f32) {
        self.set_percent(duty);
    }

    fn duty(&self) -> f32 {
        self.output
    }

    fn stop(&mut self) {
        self.target = 0.0;
        self.output = 0.0;
        self.write();
    }
}
