//! Pneumatic solenoid valves
//!
//! Valves are driven through plain digital outputs (directly or via a
//! MOSFET/relay board). Outputs can be active-high or active-low.

use baton_hal::DigitalOutput;

/// Single-acting solenoid valve
pub struct Solenoid<P> {
    pin: P,
    /// If true, valve open = pin LOW
    inverted: bool,
    extended: bool,
}

impl<P: DigitalOutput> Solenoid<P> {
    /// Create a valve; it starts retracted
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut valve = Self {
            pin,
            inverted,
            extended: false,
        };
        valve.set(false);
        valve
    }

    /// Create a valve with an active-high output
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Open or close the valve
    pub fn set(&mut self, extended: bool) {
        self.extended = extended;
        self.pin.set_state(extended != self.inverted);
    }

    /// Flip the valve and return the new state
    pub fn toggle(&mut self) -> bool {
        self.set(!self.extended);
        self.extended
    }

    /// Check if the valve is open
    pub fn is_extended(&self) -> bool {
        self.extended
    }
}

/// Position of a double-acting valve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Position {
    /// Both coils released
    #[default]
    Off,
    Forward,
    Reverse,
}

/// Double-acting solenoid valve with a coil per direction
///
/// Both coils are never energized together.
pub struct DoubleSolenoid<P> {
    forward: P,
    reverse: P,
    position: Position,
}

impl<P: DigitalOutput> DoubleSolenoid<P> {
    /// Create a valve; both coils start released
    pub fn new(forward: P, reverse: P) -> Self {
        let mut valve = Self {
            forward,
            reverse,
            position: Position::Off,
        };
        valve.set(Position::Off);
        valve
    }

    /// Drive the valve to a position
    pub fn set(&mut self, position: Position) {
        // Release before energizing the other coil
        match position {
            Position::Off => {
                self.forward.set_low();
                self.reverse.set_low();
            }
            Position::Forward => {
                self.reverse.set_low();
                self.forward.set_high();
            }
            Position::Reverse => {
                self.forward.set_low();
                self.reverse.set_high();
            }
        }
        self.position = position;
    }

    /// Swap between forward and reverse
    ///
    /// A released valve goes forward.
    pub fn toggle(&mut self) -> Position {
        let next = match self.position {
            Position::Forward => Position::Reverse,
            Position::Reverse | Position::Off => Position::Forward,
        };
        self.set(next);
        next
    }

    /// Current position
    pub fn position(&self) -> Position {
        self.position
    }
}
