//! Events that drive mode transitions

use baton_hal::ControlWord;

/// Mode change requested by the field or driver station
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModeEvent {
    /// Outputs must stop
    Disable,
    /// Driver control
    EnableTeleop,
    /// Pre-programmed routine
    EnableAutonomous,
}

impl ModeEvent {
    /// Check if this event enables outputs
    pub fn is_enable(&self) -> bool {
        !matches!(self, ModeEvent::Disable)
    }
}

impl From<ControlWord> for ModeEvent {
    /// Event requesting the mode a control word describes
    fn from(word: ControlWord) -> Self {
        match (word.enabled, word.autonomous) {
            (false, _) => ModeEvent::Disable,
            (true, true) => ModeEvent::EnableAutonomous,
            (true, false) => ModeEvent::EnableTeleop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_control_word() {
        assert_eq!(ModeEvent::from(ControlWord::disabled()), ModeEvent::Disable);
        assert_eq!(ModeEvent::from(ControlWord::teleop()), ModeEvent::EnableTeleop);
        assert_eq!(
            ModeEvent::from(ControlWord::autonomous()),
            ModeEvent::EnableAutonomous
        );
        // Autonomous flag without enable still disables
        let word = ControlWord {
            enabled: false,
            autonomous: true,
        };
        assert_eq!(ModeEvent::from(word), ModeEvent::Disable);
    }

    #[test]
    fn test_enable_events() {
        assert!(ModeEvent::EnableTeleop.is_enable());
        assert!(ModeEvent::EnableAutonomous.is_enable());
        assert!(!ModeEvent::Disable.is_enable());
    }
}
