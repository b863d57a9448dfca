//! Robot context
//!
//! The single object the scheduler passes to every command callback. It
//! owns all subsystems and operator devices of the robot.

use baton_core::{Subsystem, SubsystemId, Subsystems};
use baton_drivers::gamepad::Gamepad;
use baton_drivers::motor::{MotorGroup, MotorGroupConfig};
use baton_drivers::pneumatic::DoubleSolenoid;
use baton_hal::ButtonInput;

use crate::config::RobotConfig;
use crate::hardware::Hardware;
use crate::subsystems::{Arm, Climb, Drive, Intake, Mechanism, Shooter};
use crate::RobotError;

/// Subsystems and operator devices
pub struct RobotContext<H: Hardware> {
    pub drive: Drive<H::Motor>,
    pub climb: Climb<H::Valve>,
    pub intake: Intake<H::Motor>,
    pub shooter: Shooter<H::Motor>,
    pub arm: Arm<H::Motor>,
    /// Operator button panel
    pub panel: H::Panel,
    /// Driver gamepad
    pub gamepad: Gamepad<H::Pad>,
}

impl<H: Hardware> RobotContext<H> {
    /// Claim every device the configuration names
    pub fn build(config: &RobotConfig, hw: &mut H) -> Result<Self, RobotError> {
        let ports = &config.ports;
        let group = |inverted: bool, max_step: f32| MotorGroupConfig {
            inverted,
            nominal_voltage: config.voltages.nominal,
            max_step,
        };
        let ramp = config.drive.max_step;

        let left = MotorGroup::with_motors(
            group(false, ramp),
            [hw.motor(ports.drive_left[0])?, hw.motor(ports.drive_left[1])?],
        )?;
        let right = MotorGroup::with_motors(
            group(config.drive.right_inverted, ramp),
            [hw.motor(ports.drive_right[0])?, hw.motor(ports.drive_right[1])?],
        )?;
        let low = MotorGroup::with_motors(group(false, 0.0), [hw.motor(ports.intake_low)?])?;
        let high = MotorGroup::with_motors(group(false, 0.0), [hw.motor(ports.intake_high)?])?;
        let wheels = MotorGroup::with_motors(
            group(false, 0.0),
            [hw.motor(ports.shooter_left)?, hw.motor(ports.shooter_right)?],
        )?;
        let valve = DoubleSolenoid::new(hw.valve(ports.climb_forward)?, hw.valve(ports.climb_reverse)?);

        Ok(Self {
            drive: Drive::new(left, right),
            climb: Climb::new(valve),
            intake: Intake::new(low, high),
            shooter: Shooter::new(wheels),
            arm: Arm::new(hw.motor(ports.actuator)?),
            panel: hw.panel(config.controllers.panel_port)?,
            gamepad: Gamepad::new(
                hw.gamepad(config.controllers.gamepad_port)?,
                config.controllers.deadband,
            ),
        })
    }

    /// Zero every motor output and release the climber valve
    pub fn stop_all(&mut self) {
        self.drive.stop();
        self.intake.stop();
        self.shooter.stop();
        self.arm.stop();
        self.climb.release();
    }
}

impl<H: Hardware> Subsystems for RobotContext<H> {
    fn subsystem_mut(&mut self, id: SubsystemId) -> Option<&mut dyn Subsystem> {
        let subsystem: &mut dyn Subsystem = match Mechanism::from_id(id)? {
            Mechanism::Drive => &mut self.drive,
            Mechanism::Climb => &mut self.climb,
            Mechanism::Intake => &mut self.intake,
            Mechanism::Shooter => &mut self.shooter,
            Mechanism::Arm => &mut self.arm,
        };
        Some(subsystem)
    }
}

/// Button triggers read the operator panel
impl<H: Hardware> ButtonInput for RobotContext<H> {
    fn button_count(&self) -> u8 {
        self.panel.button_count()
    }

    fn button(&self, port: u8) -> bool {
        self.panel.button(port)
    }
}
