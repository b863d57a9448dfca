//! Driver-controlled commands

use baton_core::command::{FunctionalCommand, RaceGroup};
use baton_core::{CommandExt, Requirements, SubsystemId};
use baton_drivers::gamepad::xbox;

use super::Ctx;
use crate::config::DriveScale;
use crate::hardware::Hardware;

/// Arcade drive from the gamepad's left stick
pub fn drive<H: Hardware + 'static>(
    name: &'static str,
    drive: SubsystemId,
    scale: DriveScale,
) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::run(name, Requirements::of(drive), move |ctx: &mut Ctx<H>| {
        let throttle = ctx.gamepad.axis(xbox::LEFT_Y) * scale.forward;
        let turn = ctx.gamepad.axis(xbox::LEFT_X) * scale.turn;
        ctx.drive.arcade(throttle, turn);
        Ok(())
    })
    .on_end(|ctx: &mut Ctx<H>, _| ctx.drive.stop())
}

/// Spin the shooter at `volts` until interrupted
pub fn shooter<H: Hardware + 'static>(shooter: SubsystemId, volts: f32) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::start_end(
        "shooter",
        Requirements::of(shooter),
        move |ctx: &mut Ctx<H>| {
            ctx.shooter.set_voltage(volts);
            Ok(())
        },
        |ctx: &mut Ctx<H>| ctx.shooter.stop(),
    )
}

/// Run the shooter backwards to clear a jam
pub fn reverse_shooter<H: Hardware + 'static>(
    shooter: SubsystemId,
    volts: f32,
) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::start_end(
        "reverse shooter",
        Requirements::of(shooter),
        move |ctx: &mut Ctx<H>| {
            ctx.shooter.set_voltage(-volts);
            Ok(())
        },
        |ctx: &mut Ctx<H>| ctx.shooter.stop(),
    )
}

/// Hold the shooter stopped
pub fn shooter_off<H: Hardware + 'static>(shooter: SubsystemId) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::run("shooter off", Requirements::of(shooter), |ctx: &mut Ctx<H>| {
        ctx.shooter.stop();
        Ok(())
    })
}

/// Run both intake rollers until interrupted
pub fn intake<H: Hardware + 'static>(
    intake: SubsystemId,
    low_volts: f32,
    high_volts: f32,
) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::start_end(
        "intake",
        Requirements::of(intake),
        move |ctx: &mut Ctx<H>| {
            ctx.intake.set_voltages(low_volts, high_volts);
            Ok(())
        },
        |ctx: &mut Ctx<H>| ctx.intake.stop(),
    )
}

/// Hold the intake stopped
pub fn intake_off<H: Hardware + 'static>(intake: SubsystemId) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::run("intake off", Requirements::of(intake), |ctx: &mut Ctx<H>| {
        ctx.intake.stop();
        Ok(())
    })
}

/// Flip the climber valve once
pub fn toggle_climber<H: Hardware + 'static>(climb: SubsystemId) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::instant("solenoid", Requirements::of(climb), |ctx: &mut Ctx<H>| {
        ctx.climb.toggle();
        Ok(())
    })
}

/// Drive the arm until interrupted
pub fn arm<H: Hardware + 'static>(arm: SubsystemId, speed: f32) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::start_end(
        "arm",
        Requirements::of(arm),
        move |ctx: &mut Ctx<H>| {
            ctx.arm.set(speed);
            Ok(())
        },
        |ctx: &mut Ctx<H>| ctx.arm.stop(),
    )
}

/// Drive the arm for one full travel
pub fn arm_move<H: Hardware + 'static>(arm_id: SubsystemId, speed: f32, ticks: u32) -> RaceGroup<Ctx<H>> {
    arm::<H>(arm_id, speed).with_timeout(ticks).named("arm move")
}
