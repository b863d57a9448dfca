//! Robot configuration types
//!
//! Ports are logical controller channels; the board crate maps them to
//! physical outputs. Every value is fixed after startup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use baton_drivers::gamepad::xbox;

use super::ConfigError;

/// Number of buttons on the operator button panel
pub const PANEL_BUTTONS: usize = 14;

/// Highest accepted button port
pub const MAX_BUTTON_PORT: u8 = 32;

/// Motor controller channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PortConfig {
    /// Left drivetrain motors
    pub drive_left: [u8; 2],
    /// Right drivetrain motors
    pub drive_right: [u8; 2],
    /// Arm linear actuator
    pub actuator: u8,
    /// Lower intake roller
    pub intake_low: u8,
    /// Upper intake roller
    pub intake_high: u8,
    pub shooter_left: u8,
    pub shooter_right: u8,
    /// Climber valve, extend coil
    pub climb_forward: u8,
    /// Climber valve, retract coil
    pub climb_reverse: u8,
}

impl PortConfig {
    /// All motor channels, for duplicate checks
    pub fn motor_ports(&self) -> [u8; 9] {
        [
            self.drive_left[0],
            self.drive_left[1],
            self.drive_right[0],
            self.drive_right[1],
            self.actuator,
            self.intake_low,
            self.intake_high,
            self.shooter_left,
            self.shooter_right,
        ]
    }
}

/// Operator device ports and stick shaping
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Driver gamepad
    pub gamepad_port: u8,
    /// Operator button panel
    pub panel_port: u8,
    /// Stick deadband
    pub deadband: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gamepad_port: 1,
            panel_port: 0,
            deadband: 0.1,
        }
    }
}

/// Stick scaling for one drive direction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveScale {
    /// Multiplier on the throttle stick
    pub forward: f32,
    /// Multiplier on the turn stick
    pub turn: f32,
}

/// Drivetrain settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DriveConfig {
    /// Scaling for normal driving
    pub normal: DriveScale,
    /// Scaling while the reverse-drive button is held
    pub reversed: DriveScale,
    /// Right side is mounted mirrored
    pub right_inverted: bool,
    /// Largest duty change per tick (0 = instant)
    pub max_step: f32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            normal: DriveScale {
                forward: 0.83,
                turn: -0.83,
            },
            reversed: DriveScale {
                forward: -0.83,
                turn: 0.83,
            },
            right_inverted: true,
            max_step: 0.0,
        }
    }
}

/// Mechanism voltages
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VoltageConfig {
    /// Battery voltage corresponding to full duty
    pub nominal: f32,
    pub shooter: f32,
    /// Both intake rollers during autonomous
    pub intake_both: f32,
    /// Lower roller while intaking
    pub intake_low: f32,
    /// Upper roller while intaking
    pub intake_high: f32,
}

impl Default for VoltageConfig {
    fn default() -> Self {
        Self {
            nominal: 12.0,
            shooter: 10.0,
            intake_both: 3.0,
            intake_low: 8.0,
            intake_high: 3.0,
        }
    }
}

/// Arm actuator settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArmConfig {
    /// Actuator duty while moving
    pub speed: f32,
    /// Travel time of one arm move
    pub travel_ms: u32,
}

impl Default for ArmConfig {
    fn default() -> Self {
        Self {
            speed: 0.5,
            travel_ms: 1000,
        }
    }
}

/// Autonomous routine timing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AutoConfig {
    pub shoot_ms: u32,
    pub drive_ms: u32,
    /// Drive duty, negative backs away from the goal
    pub drive_speed: f32,
    pub turn_ms: u32,
    pub turn_speed: f32,
    pub intake_ms: u32,
    /// Abort the whole routine after this long (0 = no limit)
    pub timeout_ms: u32,
}

impl Default for AutoConfig {
    fn default() -> Self {
        Self {
            shoot_ms: 2000,
            drive_ms: 1500,
            drive_speed: -0.5,
            turn_ms: 750,
            turn_speed: 0.4,
            intake_ms: 2000,
            timeout_ms: 15000,
        }
    }
}

/// Logical button names used by the bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonName {
    /// Button on the operator panel, 1-based
    Panel(u8),
    /// Right bumper of the driver gamepad
    RightBumper,
}

/// Logical button → device port
///
/// Unmapped buttons are `None`; bindings on them fail at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonMap {
    pub panel: [Option<u8>; PANEL_BUTTONS],
    pub right_bumper: Option<u8>,
}

impl ButtonMap {
    /// Panel button `n` on port `n`, reverse drive on the gamepad's
    /// right bumper
    pub fn standard() -> Self {
        let mut map = Self::default();
        for (index, slot) in map.panel.iter_mut().enumerate() {
            *slot = Some(index as u8 + 1);
        }
        map.right_bumper = Some(xbox::RIGHT_BUMPER);
        map
    }

    /// Port of a logical button
    pub fn port(&self, name: ButtonName) -> Result<u8, ConfigError> {
        let port = match name {
            ButtonName::Panel(n) => usize::from(n)
                .checked_sub(1)
                .and_then(|index| self.panel.get(index))
                .copied()
                .flatten(),
            ButtonName::RightBumper => self.right_bumper,
        };
        port.ok_or(ConfigError::UnmappedButton(name))
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RobotConfig {
    /// Control loop period
    pub tick_ms: u32,
    pub ports: PortConfig,
    pub controllers: ControllerConfig,
    pub drive: DriveConfig,
    pub voltages: VoltageConfig,
    pub arm: ArmConfig,
    pub auto: AutoConfig,
    pub buttons: ButtonMap,
}

impl RobotConfig {
    /// Default configuration with the given ports
    pub fn with_ports(ports: PortConfig) -> Self {
        Self {
            tick_ms: 20,
            ports,
            buttons: ButtonMap::standard(),
            ..Self::default()
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::OutOfRange("tick_ms"));
        }

        let motors = self.ports.motor_ports();
        for (i, port) in motors.iter().enumerate() {
            if motors[i + 1..].contains(port) {
                return Err(ConfigError::DuplicatePort(*port));
            }
        }
        if self.ports.climb_forward == self.ports.climb_reverse {
            return Err(ConfigError::DuplicatePort(self.ports.climb_forward));
        }

        let unit = |value: f32| (-1.0..=1.0).contains(&value);
        let checks = [
            ("drive.speed_y", unit(self.drive.normal.forward)),
            ("drive.speed_x", unit(self.drive.normal.turn)),
            ("drive.reverse_speed_y", unit(self.drive.reversed.forward)),
            ("drive.reverse_speed_x", unit(self.drive.reversed.turn)),
            ("drive.max_step", (0.0..=1.0).contains(&self.drive.max_step)),
            ("controllers.deadband", (0.0..1.0).contains(&self.controllers.deadband)),
            ("arm.speed", unit(self.arm.speed)),
            ("auto.drive_speed", unit(self.auto.drive_speed)),
            ("auto.turn_speed", unit(self.auto.turn_speed)),
            ("voltages.nominal", self.voltages.nominal > 0.0),
        ];
        if let Some((key, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::OutOfRange(*key));
        }

        let volts = |value: f32| (0.0..=self.voltages.nominal).contains(&value);
        let checks = [
            ("voltages.shooter", volts(self.voltages.shooter)),
            ("voltages.intake_both", volts(self.voltages.intake_both)),
            ("voltages.intake_low", volts(self.voltages.intake_low)),
            ("voltages.intake_high", volts(self.voltages.intake_high)),
        ];
        if let Some((key, _)) = checks.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::OutOfRange(*key));
        }

        let mapped = self.buttons.panel.iter().chain(core::iter::once(&self.buttons.right_bumper));
        if mapped.flatten().any(|port| *port == 0 || *port > MAX_BUTTON_PORT) {
            return Err(ConfigError::OutOfRange("buttons"));
        }
        Ok(())
    }
}
