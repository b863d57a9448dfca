//! Hardware seam
//!
//! The robot wiring asks a [`Hardware`] implementation for each output and
//! input device by logical port. Board crates back it with real
//! peripherals; tests back it with mocks.

use baton_hal::{AxisInput, ButtonInput, DigitalOutput, MotorOutput};
use heapless::Vec;

/// Highest number of ports a bank can hold
pub const MAX_PORTS: usize = 16;

/// Hardware errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareError {
    /// Board has nothing on this port
    #[error("no device on port {0}")]
    NoSuchPort(u8),
    /// Port was already handed out
    #[error("port {0} already in use")]
    PortInUse(u8),
}

/// Device factory for one controller board
pub trait Hardware {
    /// Motor controller channel
    type Motor: MotorOutput;
    /// Solenoid coil output
    type Valve: DigitalOutput;
    /// Operator button panel
    type Panel: ButtonInput;
    /// Driver gamepad
    type Pad: ButtonInput + AxisInput;

    fn motor(&mut self, port: u8) -> Result<Self::Motor, HardwareError>;

    fn valve(&mut self, channel: u8) -> Result<Self::Valve, HardwareError>;

    fn panel(&mut self, port: u8) -> Result<Self::Panel, HardwareError>;

    fn gamepad(&mut self, port: u8) -> Result<Self::Pad, HardwareError>;
}

enum Slot<T> {
    Empty,
    Ready(T),
    Taken,
}

/// Devices indexed by port, each handed out once
pub struct PortBank<T> {
    slots: Vec<Slot<T>, MAX_PORTS>,
}

impl<T> Default for PortBank<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PortBank<T> {
    /// Create an empty bank
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Place a device on a port, replacing any device not yet taken
    pub fn insert(&mut self, port: u8, device: T) -> Result<(), HardwareError> {
        let index = usize::from(port);
        if index >= MAX_PORTS {
            return Err(HardwareError::NoSuchPort(port));
        }
        while self.slots.len() <= index {
            self.slots
                .push(Slot::Empty)
                .map_err(|_| HardwareError::NoSuchPort(port))?;
        }
        if matches!(self.slots[index], Slot::Taken) {
            return Err(HardwareError::PortInUse(port));
        }
        self.slots[index] = Slot::Ready(device);
        Ok(())
    }

    /// Take the device on a port
    pub fn take(&mut self, port: u8) -> Result<T, HardwareError> {
        let slot = self
            .slots
            .get_mut(usize::from(port))
            .ok_or(HardwareError::NoSuchPort(port))?;
        match core::mem::replace(slot, Slot::Taken) {
            Slot::Ready(device) => Ok(device),
            Slot::Taken => Err(HardwareError::PortInUse(port)),
            Slot::Empty => {
                *slot = Slot::Empty;
                Err(HardwareError::NoSuchPort(port))
            }
        }
    }

    /// Number of devices still available
    pub fn available(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }
}
