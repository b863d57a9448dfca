//! Robot configuration
//!
//! The configuration is a small TOML file compiled into the firmware and
//! parsed once at startup. Ports are required; everything else has a
//! default matching the competition robot.

pub mod toml;
pub mod types;

pub use self::toml::parse_config;
pub use types::{
    ArmConfig, AutoConfig, ButtonMap, ButtonName, ControllerConfig, DriveConfig, DriveScale,
    PortConfig, RobotConfig, VoltageConfig, PANEL_BUTTONS,
};

/// Configuration shipped with the firmware
pub const DEFAULT_CONFIG: &str = include_str!("../../robot.toml");

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Line is neither a section header nor `key = value`
    #[error("line {line}: syntax error")]
    Syntax { line: usize },
    /// Section header not recognized
    #[error("line {line}: unknown section")]
    UnknownSection { line: usize },
    /// Key not recognized in its section
    #[error("line {line}: unknown key")]
    UnknownKey { line: usize },
    /// Value has the wrong type or does not parse
    #[error("line {line}: invalid value")]
    InvalidValue { line: usize },
    /// Required key absent
    #[error("missing required key {0}")]
    MissingKey(&'static str),
    /// A binding refers to a button with no port
    #[error("button {0:?} is not mapped to a port")]
    UnmappedButton(ButtonName),
    /// Two outputs share a channel
    #[error("port {0} assigned twice")]
    DuplicatePort(u8),
    /// Value outside its accepted range
    #[error("{0} out of range")]
    OutOfRange(&'static str),
}
