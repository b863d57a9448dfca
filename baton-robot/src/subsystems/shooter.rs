//! Flywheel shooter

use baton_core::Subsystem;
use baton_drivers::motor::MotorGroup;
use baton_hal::MotorOutput;

/// Two shooter wheels driven together
pub struct Shooter<M> {
    wheels: MotorGroup<M>,
}

impl<M: MotorOutput> Shooter<M> {
    pub fn new(wheels: MotorGroup<M>) -> Self {
        Self { wheels }
    }

    /// Spin at a voltage; negative runs the wheels backwards
    pub fn set_voltage(&mut self, volts: f32) {
        self.wheels.set_voltage(volts);
    }

    pub fn stop(&mut self) {
        self.wheels.stop();
    }

    pub fn voltage(&self) -> f32 {
        self.wheels.voltage()
    }

    pub fn is_running(&self) -> bool {
        self.wheels.is_running()
    }
}

impl<M: MotorOutput> Subsystem for Shooter<M> {
    fn name(&self) -> &'static str {
        "shooter"
    }

    fn periodic(&mut self) {
        self.wheels.update();
    }
}
