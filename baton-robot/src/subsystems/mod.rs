//! Robot subsystems
//!
//! Each subsystem owns its actuators outright. Commands reach them through
//! the robot context; nothing else writes to the hardware.

pub mod arm;
pub mod climb;
pub mod drive;
pub mod intake;
pub mod shooter;

pub use arm::Arm;
pub use climb::Climb;
pub use drive::Drive;
pub use intake::Intake;
pub use shooter::Shooter;

use baton_core::SubsystemId;

/// Subsystems in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mechanism {
    Drive,
    Climb,
    Intake,
    Shooter,
    Arm,
}

impl Mechanism {
    /// All mechanisms, in the order they are registered
    pub const ALL: [Mechanism; 5] = [
        Mechanism::Drive,
        Mechanism::Climb,
        Mechanism::Intake,
        Mechanism::Shooter,
        Mechanism::Arm,
    ];

    /// Name used for logging
    pub const fn name(&self) -> &'static str {
        match self {
            Mechanism::Drive => "drive",
            Mechanism::Climb => "climb",
            Mechanism::Intake => "intake",
            Mechanism::Shooter => "shooter",
            Mechanism::Arm => "arm",
        }
    }

    /// Mechanism registered under a subsystem handle
    pub fn from_id(id: SubsystemId) -> Option<Self> {
        Self::ALL.get(id.index()).copied()
    }
}

/// Scheduler handles of the robot's subsystems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechanismIds {
    pub drive: SubsystemId,
    pub climb: SubsystemId,
    pub intake: SubsystemId,
    pub shooter: SubsystemId,
    pub arm: SubsystemId,
}
