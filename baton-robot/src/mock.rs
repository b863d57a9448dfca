//! Mock board for host tests
//!
//! Every device writes into one shared [`Bench`], so a test can hold the
//! bench and inspect outputs after the devices have moved into the robot.

use core::cell::Cell;
use std::rc::Rc;

use baton_hal::motor::clamp_duty;
use baton_hal::{AxisInput, ButtonInput, DigitalOutput, MotorOutput};

use crate::hardware::{Hardware, HardwareError, PortBank};

#[derive(Default)]
pub struct Bench {
    motors: [Cell<f32>; 10],
    valves: [Cell<bool>; 2],
    /// Index 0 unused; buttons are 1-based
    panel: [Cell<bool>; 15],
    pad_buttons: [Cell<bool>; 11],
    axes: [Cell<f32>; 6],
}

impl Bench {
    pub fn motor(&self, port: usize) -> f32 {
        self.motors[port].get()
    }

    pub fn valve(&self, channel: usize) -> bool {
        self.valves[channel].get()
    }

    pub fn set_panel(&self, button: usize, pressed: bool) {
        self.panel[button].set(pressed);
    }

    pub fn set_pad_button(&self, button: usize, pressed: bool) {
        self.pad_buttons[button].set(pressed);
    }

    pub fn set_axis(&self, axis: u8, value: f32) {
        self.axes[usize::from(axis)].set(value);
    }
}

pub struct MockMotor {
    port: usize,
    bench: Rc<Bench>,
}

impl MotorOutput for MockMotor {
    fn set_duty(&mut self, duty: f32) {
        self.bench.motors[self.port].set(clamp_duty(duty));
    }

    fn duty(&self) -> f32 {
        self.bench.motors[self.port].get()
    }
}

pub struct MockValve {
    channel: usize,
    bench: Rc<Bench>,
}

impl DigitalOutput for MockValve {
    fn set_high(&mut self) {
        self.bench.valves[self.channel].set(true);
    }

    fn set_low(&mut self) {
        self.bench.valves[self.channel].set(false);
    }

    fn is_set_high(&self) -> bool {
        self.bench.valves[self.channel].get()
    }
}

pub struct MockPanel {
    bench: Rc<Bench>,
}

impl ButtonInput for MockPanel {
    fn button_count(&self) -> u8 {
        14
    }

    fn button(&self, port: u8) -> bool {
        self.bench.panel.get(usize::from(port)).is_some_and(Cell::get)
    }
}

pub struct MockPad {
    bench: Rc<Bench>,
}

impl ButtonInput for MockPad {
    fn button_count(&self) -> u8 {
        10
    }

    fn button(&self, port: u8) -> bool {
        self.bench.pad_buttons.get(usize::from(port)).is_some_and(Cell::get)
    }
}

impl AxisInput for MockPad {
    fn axis(&self, index: u8) -> f32 {
        self.bench.axes.get(usize::from(index)).map_or(0.0, Cell::get)
    }
}

/// Board with motors on ports 0-9, valves on 0-1, the panel on port 0
/// and the gamepad on port 1
pub struct MockHardware {
    motors: PortBank<MockMotor>,
    valves: PortBank<MockValve>,
    panels: PortBank<MockPanel>,
    pads: PortBank<MockPad>,
}

impl MockHardware {
    pub fn new() -> (Self, Rc<Bench>) {
        let bench = Rc::new(Bench::default());
        let mut hw = Self {
            motors: PortBank::new(),
            valves: PortBank::new(),
            panels: PortBank::new(),
            pads: PortBank::new(),
        };
        for port in 0..10u8 {
            let motor = MockMotor {
                port: usize::from(port),
                bench: bench.clone(),
            };
            hw.motors.insert(port, motor).unwrap();
        }
        for channel in 0..2u8 {
            let valve = MockValve {
                channel: usize::from(channel),
                bench: bench.clone(),
            };
            hw.valves.insert(channel, valve).unwrap();
        }
        hw.panels.insert(0, MockPanel { bench: bench.clone() }).unwrap();
        hw.pads.insert(1, MockPad { bench: bench.clone() }).unwrap();
        (hw, bench)
    }
}

impl Hardware for MockHardware {
    type Motor = MockMotor;
    type Valve = MockValve;
    type Panel = MockPanel;
    type Pad = MockPad;

    fn motor(&mut self, port: u8) -> Result<MockMotor, HardwareError> {
        self.motors.take(port)
    }

    fn valve(&mut self, channel: u8) -> Result<MockValve, HardwareError> {
        self.valves.take(channel)
    }

    fn panel(&mut self, port: u8) -> Result<MockPanel, HardwareError> {
        self.panels.take(port)
    }

    fn gamepad(&mut self, port: u8) -> Result<MockPad, HardwareError> {
        self.pads.take(port)
    }
}
