//! Top-level robot
//!
//! Owns the scheduler, the context and the wiring, and reacts to mode
//! changes: autonomous entry starts the routine, leaving autonomous cancels
//! it, and disabling zeroes every output.

use baton_core::{ModeEvent, RobotMode, Scheduler, TickReport};
use baton_hal::ModeSource;

use crate::commands::Ctx;
use crate::config::RobotConfig;
use crate::container::Container;
use crate::hardware::Hardware;
use crate::RobotError;

pub struct Robot<H: Hardware + 'static> {
    config: RobotConfig,
    scheduler: Scheduler<Ctx<H>>,
    context: Ctx<H>,
    container: Container,
}

impl<H: Hardware + 'static> Robot<H> {
    /// Validate the configuration, claim devices and wire the robot
    ///
    /// The robot starts disabled.
    pub fn new(config: RobotConfig, hw: &mut H) -> Result<Self, RobotError> {
        config.validate()?;
        let mut context = Ctx::<H>::build(&config, hw)?;
        let mut scheduler = Scheduler::new();
        let container = Container::configure(&mut scheduler, &mut context, &config)?;

        Ok(Self {
            config,
            scheduler,
            context,
            container,
        })
    }

    /// Run one control tick
    pub fn tick(&mut self) -> TickReport {
        let report = self.scheduler.run(&mut self.context);
        if report.has_faults() {
            warn!(
                "tick {}: {} command faults ({} dropped)",
                report.tick,
                report.faults.len(),
                report.dropped_faults
            );
        }
        report
    }

    /// Apply a mode event and return the resulting mode
    pub fn handle_mode_event(&mut self, event: ModeEvent) -> RobotMode {
        let before = self.scheduler.mode();
        let after = self.scheduler.handle_mode_event(event, &mut self.context);
        if after == before {
            return after;
        }

        let auto = self.container.autonomous_command();
        match after {
            RobotMode::Autonomous => {
                if let Err(e) = self.scheduler.schedule(auto, &mut self.context) {
                    warn!("autonomous routine not started: {}", e);
                }
            }
            RobotMode::Teleop => {
                self.scheduler.cancel(auto, &mut self.context);
            }
            RobotMode::Disabled => self.context.stop_all(),
        }
        after
    }

    /// Follow the mode requested by a control word source
    pub fn poll_mode<S: ModeSource>(&mut self, source: &S) -> RobotMode {
        self.handle_mode_event(ModeEvent::from(source.control_word()))
    }

    pub fn mode(&self) -> RobotMode {
        self.scheduler.mode()
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn scheduler(&self) -> &Scheduler<Ctx<H>> {
        &self.scheduler
    }

    pub fn context(&self) -> &Ctx<H> {
        &self.context
    }

    /// Mutable context access, for board code that refreshes inputs
    pub fn context_mut(&mut self) -> &mut Ctx<H> {
        &mut self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, ButtonName, ConfigError, DEFAULT_CONFIG};
    use crate::hardware::HardwareError;
    use crate::mock::{Bench, MockHardware};
    use baton_drivers::gamepad::xbox;
    use baton_drivers::pneumatic::Position;
    use baton_hal::ControlWord;
    use std::rc::Rc;

    const SHOOTER: f32 = 10.0 / 12.0;

    fn robot_with(config: RobotConfig) -> (Robot<MockHardware>, Rc<Bench>) {
        let (mut hw, bench) = MockHardware::new();
        (Robot::new(config, &mut hw).unwrap(), bench)
    }

    fn robot() -> (Robot<MockHardware>, Rc<Bench>) {
        robot_with(parse_config(DEFAULT_CONFIG).unwrap())
    }

    fn teleop() -> (Robot<MockHardware>, Rc<Bench>) {
        let (mut robot, bench) = robot();
        robot.handle_mode_event(ModeEvent::EnableTeleop);
        robot.tick();
        (robot, bench)
    }

    fn ticks(robot: &mut Robot<MockHardware>, n: usize) {
        for _ in 0..n {
            robot.tick();
        }
    }

    #[test]
    fn test_wiring() {
        let (robot, _) = robot();
        let ids = *robot.container().ids();
        let scheduler = robot.scheduler();

        assert_eq!(robot.mode(), RobotMode::Disabled);
        assert_eq!(scheduler.subsystem_count(), 5);
        assert_eq!(scheduler.binding_count(), 12);
        assert_eq!(scheduler.subsystem_name(ids.shooter), Some("shooter"));
        assert!(scheduler.default_command(ids.drive).is_some());
        assert!(scheduler.default_command(ids.intake).is_some());
        assert!(scheduler.default_command(ids.shooter).is_some());
        assert!(scheduler.default_command(ids.climb).is_none());
        assert!(scheduler.default_command(ids.arm).is_none());
        assert_eq!(
            scheduler.command_name(robot.container().autonomous_command()),
            Some("auto")
        );
    }

    #[test]
    fn test_disabled_ignores_buttons() {
        let (mut robot, bench) = robot();
        bench.set_panel(1, true);
        ticks(&mut robot, 3);

        assert_eq!(bench.motor(8), 0.0);
        assert!(robot.scheduler().running().is_empty());
    }

    #[test]
    fn test_defaults_run_in_teleop() {
        let (mut robot, _) = teleop();
        robot.tick();
        let ids = *robot.container().ids();
        let scheduler = robot.scheduler();

        assert_eq!(scheduler.current_command(ids.drive), scheduler.default_command(ids.drive));
        assert_eq!(scheduler.current_command(ids.shooter), scheduler.default_command(ids.shooter));
        assert_eq!(scheduler.current_command(ids.climb), None);
    }

    #[test]
    fn test_shooter_while_held() {
        let (mut robot, bench) = teleop();

        bench.set_panel(1, true);
        robot.tick();
        assert_eq!(bench.motor(8), SHOOTER);
        assert_eq!(bench.motor(9), SHOOTER);

        ticks(&mut robot, 5);
        assert_eq!(bench.motor(8), SHOOTER);

        bench.set_panel(1, false);
        robot.tick();
        assert_eq!(bench.motor(8), 0.0);
        // Default takes the shooter back
        let ids = *robot.container().ids();
        assert_eq!(
            robot.scheduler().current_command(ids.shooter),
            robot.scheduler().default_command(ids.shooter)
        );
    }

    #[test]
    fn test_reverse_shooter() {
        let (mut robot, bench) = teleop();
        bench.set_panel(2, true);
        robot.tick();
        assert_eq!(bench.motor(8), -SHOOTER);
    }

    #[test]
    fn test_intake_buttons_have_separate_instances() {
        let (mut robot, bench) = teleop();

        bench.set_panel(4, true);
        robot.tick();
        bench.set_panel(5, true);
        robot.tick();

        // Releasing one button leaves the other's command running
        bench.set_panel(4, false);
        robot.tick();
        assert_eq!(bench.motor(6), 8.0 / 12.0);
        assert_eq!(bench.motor(7), 3.0 / 12.0);

        bench.set_panel(5, false);
        robot.tick();
        assert_eq!(bench.motor(6), 0.0);
        assert_eq!(bench.motor(7), 0.0);
    }

    #[test]
    fn test_two_intake_buttons_held_later_binding_holds_intake() {
        let (mut robot, bench) = teleop();
        let ids = *robot.container().ids();
        let default = robot.scheduler().default_command(ids.intake);

        bench.set_panel(4, true);
        bench.set_panel(5, true);
        ticks(&mut robot, 5);

        // Each tick panel 4 takes the intake and panel 5 takes it back
        let holder = robot.scheduler().current_command(ids.intake);
        assert!(holder.is_some() && holder != default);
        let intake_commands = robot
            .scheduler()
            .running()
            .iter()
            .filter(|id| Some(**id) == holder)
            .count();
        assert_eq!(intake_commands, 1);
        assert_eq!(bench.motor(6), 8.0 / 12.0);
        assert_eq!(bench.motor(7), 3.0 / 12.0);

        bench.set_panel(5, false);
        robot.tick();
        assert_ne!(robot.scheduler().current_command(ids.intake), holder);
        assert_eq!(bench.motor(6), 8.0 / 12.0);
    }

    #[test]
    fn test_climber_toggles_once_per_press() {
        let (mut robot, bench) = teleop();

        bench.set_panel(9, true);
        ticks(&mut robot, 3);
        assert_eq!(robot.context().climb.position(), Position::Forward);
        assert!(bench.valve(0) && !bench.valve(1));

        bench.set_panel(9, false);
        robot.tick();
        bench.set_panel(12, true);
        robot.tick();
        assert_eq!(robot.context().climb.position(), Position::Reverse);
        assert!(!bench.valve(0) && bench.valve(1));
    }

    #[test]
    fn test_arm_move_is_timed() {
        let (mut robot, bench) = teleop();

        bench.set_panel(13, true);
        robot.tick();
        bench.set_panel(13, false);
        ticks(&mut robot, 10);
        assert_eq!(bench.motor(5), 0.5);

        // 1000 ms at 20 ms per tick
        ticks(&mut robot, 50);
        assert_eq!(bench.motor(5), 0.0);
    }

    #[test]
    fn test_arm_hold() {
        let (mut robot, bench) = teleop();

        bench.set_panel(14, true);
        ticks(&mut robot, 80);
        assert_eq!(bench.motor(5), 0.5);

        bench.set_panel(14, false);
        robot.tick();
        assert_eq!(bench.motor(5), 0.0);
    }

    #[test]
    fn test_drive_follows_stick() {
        let (mut robot, bench) = teleop();
        bench.set_axis(xbox::LEFT_Y, 1.0);
        robot.tick();

        assert_eq!(bench.motor(1), 0.83);
        assert_eq!(bench.motor(3), 0.83);
        // Right side is mirrored
        assert_eq!(bench.motor(2), -0.83);
        assert_eq!(bench.motor(4), -0.83);
    }

    #[test]
    fn test_bumper_reverses_drive() {
        let (mut robot, bench) = teleop();
        bench.set_axis(xbox::LEFT_Y, 1.0);
        bench.set_pad_button(usize::from(xbox::RIGHT_BUMPER), true);
        robot.tick();

        let reverse = robot.container().reverse_drive_command();
        assert!(robot.scheduler().is_scheduled(reverse));
        assert_eq!(bench.motor(1), -0.83);

        bench.set_pad_button(usize::from(xbox::RIGHT_BUMPER), false);
        ticks(&mut robot, 2);
        assert!(!robot.scheduler().is_scheduled(reverse));
        assert_eq!(bench.motor(1), 0.83);
    }

    #[test]
    fn test_autonomous_routine() {
        let (mut robot, bench) = robot();
        let auto = robot.container().autonomous_command();

        assert_eq!(robot.handle_mode_event(ModeEvent::EnableAutonomous), RobotMode::Autonomous);
        assert!(robot.scheduler().is_scheduled(auto));
        assert_eq!(bench.motor(8), SHOOTER);

        // Shoot for 100 ticks, then back away
        ticks(&mut robot, 105);
        assert_eq!(bench.motor(8), 0.0);
        assert_eq!(robot.context().drive.duties().left, -0.5);
        assert_eq!(robot.context().drive.duties().right, -0.5);

        // Drive for 75 ticks, then turn
        ticks(&mut robot, 95);
        assert_eq!(robot.context().drive.duties().left, 0.4);
        assert_eq!(robot.context().drive.duties().right, -0.4);

        // Turn for 38 ticks, then intake
        ticks(&mut robot, 50);
        assert_eq!(robot.context().intake.voltages(), (3.0, 3.0));
        assert_eq!(robot.context().drive.duties().left, 0.0);

        // Intake for 100 ticks, then the routine is over
        ticks(&mut robot, 100);
        assert!(!robot.scheduler().is_scheduled(auto));
        assert!(!robot.context().intake.is_running());
    }

    #[test]
    fn test_teleop_cancels_autonomous() {
        let (mut robot, bench) = robot();
        let auto = robot.container().autonomous_command();

        robot.handle_mode_event(ModeEvent::EnableAutonomous);
        ticks(&mut robot, 5);
        robot.handle_mode_event(ModeEvent::EnableTeleop);

        assert!(!robot.scheduler().is_scheduled(auto));
        assert_eq!(bench.motor(8), 0.0);

        robot.tick();
        let ids = *robot.container().ids();
        assert_eq!(
            robot.scheduler().current_command(ids.drive),
            robot.scheduler().default_command(ids.drive)
        );
    }

    #[test]
    fn test_disable_stops_everything() {
        let (mut robot, bench) = teleop();
        bench.set_panel(1, true);
        bench.set_panel(14, true);
        robot.tick();
        assert_eq!(bench.motor(8), SHOOTER);

        assert_eq!(robot.handle_mode_event(ModeEvent::Disable), RobotMode::Disabled);
        assert!(robot.scheduler().running().is_empty());
        for port in 0..10 {
            assert_eq!(bench.motor(port), 0.0, "motor {port}");
        }

        // Held buttons stay ignored while disabled
        ticks(&mut robot, 3);
        assert_eq!(bench.motor(8), 0.0);
    }

    struct Switch(ControlWord);

    impl ModeSource for Switch {
        fn control_word(&self) -> ControlWord {
            self.0
        }
    }

    #[test]
    fn test_poll_mode_follows_control_word() {
        let (mut robot, _) = robot();
        let auto = robot.container().autonomous_command();

        assert_eq!(robot.poll_mode(&Switch(ControlWord::teleop())), RobotMode::Teleop);
        assert_eq!(robot.poll_mode(&Switch(ControlWord::teleop())), RobotMode::Teleop);
        assert!(!robot.scheduler().is_scheduled(auto));

        assert_eq!(
            robot.poll_mode(&Switch(ControlWord::autonomous())),
            RobotMode::Autonomous
        );
        assert!(robot.scheduler().is_scheduled(auto));

        assert_eq!(robot.poll_mode(&Switch(ControlWord::disabled())), RobotMode::Disabled);
        assert!(!robot.scheduler().is_scheduled(auto));
    }

    #[test]
    fn test_unmapped_button_fails_startup() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.buttons.panel[12] = None;
        let (mut hw, _) = MockHardware::new();

        assert_eq!(
            Robot::new(config, &mut hw).err(),
            Some(RobotError::Config(ConfigError::UnmappedButton(ButtonName::Panel(13))))
        );
    }

    #[test]
    fn test_missing_device_fails_startup() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.ports.actuator = 12;
        let (mut hw, _) = MockHardware::new();

        assert_eq!(
            Robot::new(config, &mut hw).err(),
            Some(RobotError::Hardware(HardwareError::NoSuchPort(12)))
        );
    }

    #[test]
    fn test_invalid_config_fails_startup() {
        let mut config = parse_config(DEFAULT_CONFIG).unwrap();
        config.ports.intake_high = config.ports.intake_low;
        let (mut hw, _) = MockHardware::new();

        assert_eq!(
            Robot::new(config, &mut hw).err(),
            Some(RobotError::Config(ConfigError::DuplicatePort(6)))
        );
    }
}
