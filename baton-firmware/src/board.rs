//! Controller board wiring
//!
//! | Function            | Pins         | Peripheral    |
//! |---------------------|--------------|---------------|
//! | Station link RX     | GPIO1        | UART0         |
//! | Motor ports 0-1     | GPIO2, 3     | PWM slice 1   |
//! | Motor ports 2-3     | GPIO4, 5     | PWM slice 2   |
//! | Motor ports 4-5     | GPIO6, 7     | PWM slice 3   |
//! | Motor ports 6-7     | GPIO8, 9     | PWM slice 4   |
//! | Motor ports 8-9     | GPIO10, 11   | PWM slice 5   |
//! | Valve channels 0-1  | GPIO14, 15   | GPIO          |
//!
//! Operator controls arrive over the station link: the button panel on
//! controller port 0 and the gamepad on port 1.

use baton_drivers::station::{StationPad, StationPanel};
use baton_hal_rp2040::{PinOutput, ServoMotor};
use baton_robot::{Hardware, HardwareError, PortBank};
use embassy_rp::gpio::Output;
use embassy_rp::pwm::{Pwm, PwmOutput};

use crate::channels::STATION;

/// Motor channels wired on the board
pub const MOTOR_CHANNELS: u8 = 10;

/// Controller port of the button panel
pub const PANEL_PORT: u8 = 0;

/// Controller port of the gamepad
pub const GAMEPAD_PORT: u8 = 1;

pub type Motor = ServoMotor<PwmOutput<'static>>;
pub type Valve = PinOutput<Output<'static>>;

/// Devices not yet claimed by the robot
pub struct Board {
    motors: PortBank<Motor>,
    valves: PortBank<Valve>,
    panels: PortBank<StationPanel<'static>>,
    pads: PortBank<StationPad<'static>>,
}

impl Board {
    /// Board with the station controllers attached and no outputs yet
    pub fn new() -> Result<Self, HardwareError> {
        let mut panels = PortBank::new();
        panels.insert(PANEL_PORT, STATION.panel())?;
        let mut pads = PortBank::new();
        pads.insert(GAMEPAD_PORT, STATION.gamepad())?;

        Ok(Self {
            motors: PortBank::new(),
            valves: PortBank::new(),
            panels,
            pads,
        })
    }

    /// Attach both channels of a PWM slice as motor ports `first` and
    /// `first + 1`
    pub fn add_motor_pair(&mut self, first: u8, pwm: Pwm<'static>) -> Result<(), HardwareError> {
        if first + 1 >= MOTOR_CHANNELS {
            return Err(HardwareError::NoSuchPort(first + 1));
        }
        let (a, b) = pwm.split();
        let a = a.ok_or(HardwareError::NoSuchPort(first))?;
        let b = b.ok_or(HardwareError::NoSuchPort(first + 1))?;
        self.motors.insert(first, ServoMotor::new(a))?;
        self.motors.insert(first + 1, ServoMotor::new(b))?;
        Ok(())
    }

    /// Attach a valve driver pin as a valve channel
    pub fn add_valve(&mut self, channel: u8, pin: Output<'static>) -> Result<(), HardwareError> {
        self.valves.insert(channel, PinOutput::new(pin))
    }
}

impl Hardware for Board {
    type Motor = Motor;
    type Valve = Valve;
    type Panel = StationPanel<'static>;
    type Pad = StationPad<'static>;

    fn motor(&mut self, port: u8) -> Result<Self::Motor, HardwareError> {
        self.motors.take(port)
    }

    fn valve(&mut self, channel: u8) -> Result<Self::Valve, HardwareError> {
        self.valves.take(channel)
    }

    fn panel(&mut self, port: u8) -> Result<Self::Panel, HardwareError> {
        self.panels.take(port)
    }

    fn gamepad(&mut self, port: u8) -> Result<Self::Pad, HardwareError> {
        self.pads.take(port)
    }
}
