//! Solenoid valve outputs
//!
//! Valve drivers are switched by a plain push-pull GPIO.

use baton_hal::DigitalOutput;
use embedded_hal::digital::OutputPin;

/// Digital output on any embedded-hal pin
///
/// The driven level is cached because reading back a stateful pin needs
/// `&mut` access.
pub struct PinOutput<P> {
    pin: P,
    high: bool,
}

impl<P: OutputPin> PinOutput<P> {
    /// Take a pin and drive it low
    pub fn new(mut pin: P) -> Self {
        // RP2040 GPIO writes cannot fail
        let _ = pin.set_low();
        Self { pin, high: false }
    }

    /// Release the pin
    pub fn free(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> DigitalOutput for PinOutput<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType;

    struct Pin {
        level: bool,
        writes: u8,
    }

    impl ErrorType for Pin {
        type Error = Infallible;
    }

    impl OutputPin for Pin {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.level = false;
            self.writes += 1;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.level = true;
            self.writes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_starts_low() {
        let output = PinOutput::new(Pin { level: true, writes: 0 });
        assert!(!output.is_set_high());
        assert!(!output.free().level);
    }

    #[test]
    fn test_toggle_drives_pin() {
        let mut output = PinOutput::new(Pin { level: false, writes: 0 });
        output.toggle();
        assert!(output.is_set_high());
        output.toggle();

        let pin = output.free();
        assert!(!pin.level);
        assert_eq!(pin.writes, 3);
    }
}
