//! Autonomous routine
//!
//! Shoot the preloaded ball, back away from the goal, turn toward the
//! field and run the intake. Each step is bounded by time; the robot has
//! no gyro, so the turn is timed as well.

use alloc::vec;

use baton_core::command::{ticks_for_millis, Child, FunctionalCommand, RaceGroup, SequentialGroup};
use baton_core::{CommandExt, Requirements, SubsystemId};

use super::Ctx;
use crate::config::RobotConfig;
use crate::hardware::Hardware;
use crate::subsystems::MechanismIds;

/// Spin the shooter for `ticks`
pub fn auto_shoot<H: Hardware + 'static>(shooter: SubsystemId, volts: f32, ticks: u32) -> RaceGroup<Ctx<H>> {
    super::teleop::shooter::<H>(shooter, volts)
        .with_timeout(ticks)
        .named("auto shoot")
}

/// Drive both sides at `speed` for `ticks`
pub fn auto_drive<H: Hardware + 'static>(drive: SubsystemId, speed: f32, ticks: u32) -> RaceGroup<Ctx<H>> {
    wheels::<H>(drive, speed, speed).with_timeout(ticks).named("auto drive")
}

/// Spin in place for `ticks`; positive turns right
pub fn auto_turn<H: Hardware + 'static>(drive: SubsystemId, speed: f32, ticks: u32) -> RaceGroup<Ctx<H>> {
    wheels::<H>(drive, speed, -speed).with_timeout(ticks).named("auto turn")
}

/// Run both intake rollers at `volts` for `ticks`
pub fn auto_intake<H: Hardware + 'static>(intake: SubsystemId, volts: f32, ticks: u32) -> RaceGroup<Ctx<H>> {
    super::teleop::intake::<H>(intake, volts, volts)
        .with_timeout(ticks)
        .named("auto intake")
}

/// Complete autonomous routine
///
/// Bounded by `auto.timeout_ms` when it is non-zero.
pub fn routine<H: Hardware + 'static>(ids: &MechanismIds, config: &RobotConfig) -> Child<Ctx<H>> {
    let ticks = |ms: u32| ticks_for_millis(ms, config.tick_ms);
    let auto = &config.auto;

    let sequence = SequentialGroup::new(vec![
        auto_shoot::<H>(ids.shooter, config.voltages.shooter, ticks(auto.shoot_ms)).boxed(),
        auto_drive::<H>(ids.drive, auto.drive_speed, ticks(auto.drive_ms)).boxed(),
        auto_turn::<H>(ids.drive, auto.turn_speed, ticks(auto.turn_ms)).boxed(),
        auto_intake::<H>(ids.intake, config.voltages.intake_both, ticks(auto.intake_ms)).boxed(),
    ])
    .named("auto");

    if auto.timeout_ms > 0 {
        sequence.with_timeout(ticks(auto.timeout_ms)).named("auto").boxed()
    } else {
        sequence.boxed()
    }
}

fn wheels<H: Hardware + 'static>(drive: SubsystemId, left: f32, right: f32) -> FunctionalCommand<Ctx<H>> {
    FunctionalCommand::start_end(
        "wheels",
        Requirements::of(drive),
        move |ctx: &mut Ctx<H>| {
            ctx.drive.tank(left, right);
            Ok(())
        },
        |ctx: &mut Ctx<H>| ctx.drive.stop(),
    )
}
