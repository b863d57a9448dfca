//! Digital output abstractions
//!
//! Solenoid valves and indicator outputs are plain on/off pins.

/// Digital output pin
///
/// Implementations handle the register writes for the specific chip.
pub trait DigitalOutput {
    /// Drive the output high (logic 1)
    fn set_high(&mut self);

    /// Drive the output low (logic 0)
    fn set_low(&mut self);

    /// Set the output to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Flip the output
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }

    /// Check if the output is currently driven high
    fn is_set_high(&self) -> bool;
}
