//! Two-roller intake

use baton_core::Subsystem;
use baton_drivers::motor::MotorGroup;
use baton_hal::MotorOutput;

/// Lower and upper intake rollers
pub struct Intake<M> {
    low: MotorGroup<M>,
    high: MotorGroup<M>,
}

impl<M: MotorOutput> Intake<M> {
    pub fn new(low: MotorGroup<M>, high: MotorGroup<M>) -> Self {
        Self { low, high }
    }

    /// Drive each roller at a voltage
    pub fn set_voltages(&mut self, low: f32, high: f32) {
        self.low.set_voltage(low);
        self.high.set_voltage(high);
    }

    pub fn stop(&mut self) {
        self.low.stop();
        self.high.stop();
    }

    /// Applied voltages (low, high)
    pub fn voltages(&self) -> (f32, f32) {
        (self.low.voltage(), self.high.voltage())
    }

    pub fn is_running(&self) -> bool {
        self.low.is_running() || self.high.is_running()
    }
}

impl<M: MotorOutput> Subsystem for Intake<M> {
    fn name(&self) -> &'static str {
        "intake"
    }

    fn periodic(&mut self) {
        self.low.update();
        self.high.update();
    }
}
