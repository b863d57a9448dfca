//! Operator input abstractions
//!
//! Inputs are polled once per control tick. Button ports are 1-based to
//! match the labels printed on operator panels and gamepads.

/// Digital buttons on an operator device
pub trait ButtonInput {
    /// Number of buttons this device exposes
    fn button_count(&self) -> u8;

    /// Current state of a button (1-based port)
    ///
    /// Ports outside `1..=button_count()` read as released.
    fn button(&self, port: u8) -> bool;
}

/// Analog axes on an operator device
pub trait AxisInput {
    /// Current value of an axis in `[-1.0, 1.0]`
    ///
    /// Unknown axes read as zero.
    fn axis(&self, index: u8) -> f32;
}

/// Enable/autonomous control word from the field or a mode switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlWord {
    /// Outputs may be driven
    pub enabled: bool,
    /// Autonomous period is active
    pub autonomous: bool,
}

impl ControlWord {
    /// Disabled control word
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            autonomous: false,
        }
    }

    /// Enabled, operator-controlled
    pub const fn teleop() -> Self {
        Self {
            enabled: true,
            autonomous: false,
        }
    }

    /// Enabled, autonomous
    pub const fn autonomous() -> Self {
        Self {
            enabled: true,
            autonomous: true,
        }
    }
}

/// Source of the robot control word
pub trait ModeSource {
    /// Read the current control word
    fn control_word(&self) -> ControlWord;
}
