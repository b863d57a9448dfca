//! Mode state machine definition

use super::events::ModeEvent;

/// Outer program mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RobotMode {
    /// Outputs off, no commands scheduled
    #[default]
    Disabled,
    /// Enabled under driver control
    Teleop,
    /// Enabled running the autonomous routine
    Autonomous,
}

impl RobotMode {
    /// Check if commands may run in this mode
    pub fn is_enabled(&self) -> bool {
        !matches!(self, RobotMode::Disabled)
    }

    /// Process an event and return the next mode
    pub fn transition(self, event: ModeEvent) -> Self {
        use ModeEvent::*;
        use RobotMode::*;

        match (self, event) {
            (_, Disable) => Disabled,

            // Enabling from disabled
            (Disabled, EnableTeleop) => Teleop,
            (Disabled, EnableAutonomous) => Autonomous,

            // Field switches period without a disable in between
            (Autonomous, EnableTeleop) => Teleop,
            (Teleop, EnableAutonomous) => Autonomous,

            // Repeated enable: stay
            _ => self,
        }
    }

    /// Event that leads into this mode from any other
    pub fn entry_event(&self) -> ModeEvent {
        match self {
            RobotMode::Disabled => ModeEvent::Disable,
            RobotMode::Teleop => ModeEvent::EnableTeleop,
            RobotMode::Autonomous => ModeEvent::EnableAutonomous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [RobotMode; 3] = [RobotMode::Disabled, RobotMode::Teleop, RobotMode::Autonomous];

    #[test]
    fn test_starts_disabled() {
        assert_eq!(RobotMode::default(), RobotMode::Disabled);
        assert!(!RobotMode::default().is_enabled());
    }

    #[test]
    fn test_disable_from_any_mode() {
        for mode in MODES {
            assert_eq!(mode.transition(ModeEvent::Disable), RobotMode::Disabled);
        }
    }

    #[test]
    fn test_enable_transitions() {
        assert_eq!(
            RobotMode::Disabled.transition(ModeEvent::EnableTeleop),
            RobotMode::Teleop
        );
        assert_eq!(
            RobotMode::Disabled.transition(ModeEvent::EnableAutonomous),
            RobotMode::Autonomous
        );
        assert_eq!(
            RobotMode::Autonomous.transition(ModeEvent::EnableTeleop),
            RobotMode::Teleop
        );
    }

    #[test]
    fn test_repeated_enable_is_stable() {
        assert_eq!(
            RobotMode::Teleop.transition(ModeEvent::EnableTeleop),
            RobotMode::Teleop
        );
        assert_eq!(
            RobotMode::Autonomous.transition(ModeEvent::EnableAutonomous),
            RobotMode::Autonomous
        );
    }

    #[test]
    fn test_entry_event_reaches_mode() {
        for from in MODES {
            for to in MODES {
                assert_eq!(from.transition(to.entry_event()), to);
            }
        }
    }
}
