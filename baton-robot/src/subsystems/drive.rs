//! Tank drivetrain

use baton_core::Subsystem;
use baton_drivers::gamepad::{arcade, WheelDuties};
use baton_drivers::motor::MotorGroup;
use baton_hal::MotorOutput;

/// Left and right motor groups
pub struct Drive<M> {
    left: MotorGroup<M>,
    right: MotorGroup<M>,
}

impl<M: MotorOutput> Drive<M> {
    pub fn new(left: MotorGroup<M>, right: MotorGroup<M>) -> Self {
        Self { left, right }
    }

    /// Drive from a throttle and a turn rate
    pub fn arcade(&mut self, throttle: f32, turn: f32) {
        let duties = arcade(throttle, turn);
        self.tank(duties.left, duties.right);
    }

    /// Drive each side directly
    pub fn tank(&mut self, left: f32, right: f32) {
        self.left.set_percent(left);
        self.right.set_percent(right);
    }

    pub fn stop(&mut self) {
        self.left.stop();
        self.right.stop();
    }

    /// Duties currently applied, before inversion
    pub fn duties(&self) -> WheelDuties {
        WheelDuties {
            left: self.left.duty(),
            right: self.right.duty(),
        }
    }

    pub fn left(&self) -> &MotorGroup<M> {
        &self.left
    }

    pub fn right(&self) -> &MotorGroup<M> {
        &self.right
    }
}

impl<M: MotorOutput> Subsystem for Drive<M> {
    fn name(&self) -> &'static str {
        "drive"
    }

    fn periodic(&mut self) {
        self.left.update();
        self.right.update();
    }
}
