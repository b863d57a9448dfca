//! Linear-actuator arm

use baton_core::Subsystem;
use baton_hal::MotorOutput;

pub struct Arm<M> {
    actuator: M,
}

impl<M: MotorOutput> Arm<M> {
    pub fn new(mut actuator: M) -> Self {
        actuator.stop();
        Self { actuator }
    }

    /// Drive the actuator; positive extends
    pub fn set(&mut self, speed: f32) {
        self.actuator.set_duty(speed);
    }

    pub fn stop(&mut self) {
        self.actuator.stop();
    }

    pub fn speed(&self) -> f32 {
        self.actuator.duty()
    }
}

impl<M: MotorOutput> Subsystem for Arm<M> {
    fn name(&self) -> &'static str {
        "arm"
    }
}
