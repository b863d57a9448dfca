//! Pneumatic climber

use baton_core::Subsystem;
use baton_drivers::pneumatic::{DoubleSolenoid, Position};
use baton_hal::DigitalOutput;

/// Climber arms on a double-acting valve
pub struct Climb<P> {
    valve: DoubleSolenoid<P>,
}

impl<P: DigitalOutput> Climb<P> {
    pub fn new(valve: DoubleSolenoid<P>) -> Self {
        Self { valve }
    }

    /// Swap the climber between extended and retracted
    pub fn toggle(&mut self) -> Position {
        let position = self.valve.toggle();
        debug!("climber {}", position);
        position
    }

    /// Release both coils
    pub fn release(&mut self) {
        self.valve.set(Position::Off);
    }

    pub fn position(&self) -> Position {
        self.valve.position()
    }
}

impl<P: DigitalOutput> Subsystem for Climb<P> {
    fn name(&self) -> &'static str {
        "climb"
    }
}
