//! Robot wiring
//!
//! Registers the subsystems with the scheduler, installs their default
//! commands and binds operator buttons. Every binding gets its own command
//! instance.
//!
//! | Button            | Binding    | Command         |
//! |-------------------|------------|-----------------|
//! | panel 1           | while held | shooter         |
//! | panel 2           | while held | reverse shooter |
//! | panel 4-6, 10, 11 | while held | intake          |
//! | panel 9, 12       | on press   | toggle climber  |
//! | panel 13          | on press   | arm, one travel |
//! | panel 14          | while held | arm             |
//! | right bumper      | while held | reverse drive   |
//!
//! The intake buttons share one subsystem. Holding two of them at once makes
//! the later binding win each tick, so both intake commands restart every
//! tick while both stay held.

use baton_core::command::{ticks_for_millis, Child};
use baton_core::{BindingKind, CommandExt, CommandId, Scheduler, Trigger};
use baton_hal::ButtonInput;

use crate::commands::{auto, teleop, Ctx};
use crate::config::{ButtonName, RobotConfig};
use crate::hardware::Hardware;
use crate::subsystems::{Mechanism, MechanismIds};
use crate::RobotError;

/// Behaviors an operator button can start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    Shooter,
    ReverseShooter,
    Intake,
    ToggleClimber,
    ArmMove,
    ArmHold,
}

/// Panel button bindings, in evaluation order
pub const PANEL_BINDINGS: [(u8, BindingKind, Action); 11] = [
    (1, BindingKind::WhileHeld, Action::Shooter),
    (2, BindingKind::WhileHeld, Action::ReverseShooter),
    (4, BindingKind::WhileHeld, Action::Intake),
    (5, BindingKind::WhileHeld, Action::Intake),
    (6, BindingKind::WhileHeld, Action::Intake),
    (9, BindingKind::OnPress, Action::ToggleClimber),
    (10, BindingKind::WhileHeld, Action::Intake),
    (11, BindingKind::WhileHeld, Action::Intake),
    (12, BindingKind::OnPress, Action::ToggleClimber),
    (13, BindingKind::OnPress, Action::ArmMove),
    (14, BindingKind::WhileHeld, Action::ArmHold),
];

/// Handles produced while wiring the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Container {
    ids: MechanismIds,
    autonomous: CommandId,
    reverse_drive: CommandId,
}

impl Container {
    /// Wire the robot into a fresh scheduler
    ///
    /// Every button port is resolved first, so a button without a port
    /// fails before any subsystem or binding is registered.
    pub fn configure<H: Hardware + 'static>(
        scheduler: &mut Scheduler<Ctx<H>>,
        ctx: &mut Ctx<H>,
        config: &RobotConfig,
    ) -> Result<Self, RobotError> {
        let mut panel_ports = [0u8; PANEL_BINDINGS.len()];
        for (port, (button, _, _)) in panel_ports.iter_mut().zip(PANEL_BINDINGS) {
            *port = config.buttons.port(ButtonName::Panel(button))?;
        }
        let bumper = config.buttons.port(ButtonName::RightBumper)?;

        let mut registered = [None; 5];
        for (slot, mechanism) in registered.iter_mut().zip(Mechanism::ALL) {
            let id = scheduler.register_subsystem(mechanism.name())?;
            if Mechanism::from_id(id) != Some(mechanism) {
                return Err(RobotError::Wiring("subsystem registration order"));
            }
            *slot = Some(id);
        }
        let [Some(drive), Some(climb), Some(intake), Some(shooter), Some(arm)] = registered else {
            return Err(RobotError::Wiring("subsystem registration"));
        };
        let ids = MechanismIds {
            drive,
            climb,
            intake,
            shooter,
            arm,
        };

        // Defaults
        let drive_default = scheduler.register(teleop::drive::<H>("drive", ids.drive, config.drive.normal))?;
        scheduler.set_default_command(ids.drive, drive_default, ctx)?;
        let intake_default = scheduler.register(teleop::intake_off::<H>(ids.intake))?;
        scheduler.set_default_command(ids.intake, intake_default, ctx)?;
        let shooter_default = scheduler.register(teleop::shooter_off::<H>(ids.shooter))?;
        scheduler.set_default_command(ids.shooter, shooter_default, ctx)?;

        // Panel buttons
        for ((button, kind, action), port) in PANEL_BINDINGS.into_iter().zip(panel_ports) {
            let command = scheduler.register_boxed(build_action::<H>(action, &ids, config))?;
            scheduler.bind(Trigger::button(port), kind, command)?;
            debug!("panel {} on port {} -> {}", button, port, action);
        }

        // Gamepad bumper
        let reverse_drive = scheduler.register(teleop::drive::<H>("reverse drive", ids.drive, config.drive.reversed))?;
        scheduler.bind(
            Trigger::new(move |ctx: &Ctx<H>| ctx.gamepad.button(bumper)),
            BindingKind::WhileHeld,
            reverse_drive,
        )?;

        let autonomous = scheduler.register_boxed(auto::routine::<H>(&ids, config))?;

        info!(
            "wired {} subsystems, {} bindings",
            scheduler.subsystem_count(),
            scheduler.binding_count()
        );
        Ok(Self {
            ids,
            autonomous,
            reverse_drive,
        })
    }

    /// Subsystem handles
    pub fn ids(&self) -> &MechanismIds {
        &self.ids
    }

    /// Routine scheduled when autonomous starts
    pub fn autonomous_command(&self) -> CommandId {
        self.autonomous
    }

    /// Drive command bound to the right bumper
    pub fn reverse_drive_command(&self) -> CommandId {
        self.reverse_drive
    }
}

fn build_action<H: Hardware + 'static>(action: Action, ids: &MechanismIds, config: &RobotConfig) -> Child<Ctx<H>> {
    let volts = &config.voltages;
    match action {
        Action::Shooter => teleop::shooter::<H>(ids.shooter, volts.shooter).boxed(),
        Action::ReverseShooter => teleop::reverse_shooter::<H>(ids.shooter, volts.shooter).boxed(),
        Action::Intake => teleop::intake::<H>(ids.intake, volts.intake_low, volts.intake_high).boxed(),
        Action::ToggleClimber => teleop::toggle_climber::<H>(ids.climb).boxed(),
        Action::ArmMove => {
            let ticks = ticks_for_millis(config.arm.travel_ms, config.tick_ms);
            teleop::arm_move::<H>(ids.arm, config.arm.speed, ticks).boxed()
        }
        Action::ArmHold => teleop::arm::<H>(ids.arm, config.arm.speed).boxed(),
    }
}
