//! Minimal TOML parser for the robot configuration
//!
//! Handles only the subset the robot file uses:
//! - `key = value` pairs (integer, float, boolean)
//! - Two-element integer arrays: `drive_left = [1, 3]`
//! - `[section]` headers
//! - Comments (`# ...`), including after a value
//!
//! Not supported: strings, nested tables, dotted keys.

use super::types::{PortConfig, RobotConfig, PANEL_BUTTONS};
use super::ConfigError;

/// Keys that must appear in `[ports]`
const PORT_KEYS: [&str; 9] = [
    "drive_left",
    "drive_right",
    "actuator",
    "intake_low",
    "intake_high",
    "shooter_left",
    "shooter_right",
    "climb_forward",
    "climb_reverse",
];

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Ports,
    Controllers,
    Drive,
    Voltages,
    Arm,
    Auto,
    Buttons,
}

/// Parse and validate a robot configuration
pub fn parse_config(input: &str) -> Result<RobotConfig, ConfigError> {
    let mut config = RobotConfig::with_ports(PortConfig::default());
    let mut section = Section::Root;
    // Bit per PORT_KEYS entry
    let mut seen_ports: u16 = 0;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && !line.contains('=') {
            let header = strip_comment(line);
            let name = header
                .strip_prefix('[')
                .and_then(|h| h.strip_suffix(']'))
                .ok_or(ConfigError::Syntax { line: line_no })?;
            section = parse_section_header(name).ok_or(ConfigError::UnknownSection { line: line_no })?;

            // An explicit button table replaces the standard map
            if section == Section::Buttons {
                config.buttons = Default::default();
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::Syntax { line: line_no })?;
        match apply_value(section, key, value, &mut config, &mut seen_ports) {
            Ok(()) => {}
            Err(ValueError::UnknownKey) => return Err(ConfigError::UnknownKey { line: line_no }),
            Err(ValueError::Invalid) => return Err(ConfigError::InvalidValue { line: line_no }),
        }
    }

    if let Some(missing) = PORT_KEYS
        .iter()
        .enumerate()
        .find(|(bit, _)| seen_ports & (1 << bit) == 0)
        .map(|(_, key)| *key)
    {
        return Err(ConfigError::MissingKey(missing));
    }

    config.validate()?;
    Ok(config)
}

enum ValueError {
    UnknownKey,
    Invalid,
}

impl From<core::num::ParseIntError> for ValueError {
    fn from(_: core::num::ParseIntError) -> Self {
        ValueError::Invalid
    }
}

impl From<core::num::ParseFloatError> for ValueError {
    fn from(_: core::num::ParseFloatError) -> Self {
        ValueError::Invalid
    }
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "ports" => Some(Section::Ports),
        "controllers" => Some(Section::Controllers),
        "drive" => Some(Section::Drive),
        "voltages" => Some(Section::Voltages),
        "arm" => Some(Section::Arm),
        "auto" => Some(Section::Auto),
        "buttons" => Some(Section::Buttons),
        _ => None,
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut RobotConfig,
    seen_ports: &mut u16,
) -> Result<(), ValueError> {
    match section {
        Section::Root => match key {
            "tick_ms" => config.tick_ms = value.parse()?,
            _ => return Err(ValueError::UnknownKey),
        },

        Section::Ports => {
            let ports = &mut config.ports;
            match key {
                "drive_left" => ports.drive_left = parse_pair(value)?,
                "drive_right" => ports.drive_right = parse_pair(value)?,
                "actuator" => ports.actuator = value.parse()?,
                "intake_low" => ports.intake_low = value.parse()?,
                "intake_high" => ports.intake_high = value.parse()?,
                "shooter_left" => ports.shooter_left = value.parse()?,
                "shooter_right" => ports.shooter_right = value.parse()?,
                "climb_forward" => ports.climb_forward = value.parse()?,
                "climb_reverse" => ports.climb_reverse = value.parse()?,
                _ => return Err(ValueError::UnknownKey),
            }
            if let Some(bit) = PORT_KEYS.iter().position(|k| *k == key) {
                *seen_ports |= 1 << bit;
            }
        }

        Section::Controllers => {
            let controllers = &mut config.controllers;
            match key {
                "gamepad" => controllers.gamepad_port = value.parse()?,
                "panel" => controllers.panel_port = value.parse()?,
                "deadband" => controllers.deadband = value.parse()?,
                _ => return Err(ValueError::UnknownKey),
            }
        }

        Section::Drive => {
            let drive = &mut config.drive;
            match key {
                "speed_y" => drive.normal.forward = value.parse()?,
                "speed_x" => drive.normal.turn = value.parse()?,
                "reverse_speed_y" => drive.reversed.forward = value.parse()?,
                "reverse_speed_x" => drive.reversed.turn = value.parse()?,
                "right_inverted" => drive.right_inverted = parse_bool(value)?,
                "max_step" => drive.max_step = value.parse()?,
                _ => return Err(ValueError::UnknownKey),
            }
        }

        Section::Voltages => {
            let volts = &mut config.voltages;
            match key {
                "nominal" => volts.nominal = value.parse()?,
                "shooter" => volts.shooter = value.parse()?,
                "intake_both" => volts.intake_both = value.parse()?,
                "intake_low" => volts.intake_low = value.parse()?,
                "intake_high" => volts.intake_high = value.parse()?,
                _ => return Err(ValueError::UnknownKey),
            }
        }

        Section::Arm => match key {
            "speed" => config.arm.speed = value.parse()?,
            "travel_ms" => config.arm.travel_ms = value.parse()?,
            _ => return Err(ValueError::UnknownKey),
        },

        Section::Auto => {
            let auto = &mut config.auto;
            match key {
                "shoot_ms" => auto.shoot_ms = value.parse()?,
                "drive_ms" => auto.drive_ms = value.parse()?,
                "drive_speed" => auto.drive_speed = value.parse()?,
                "turn_ms" => auto.turn_ms = value.parse()?,
                "turn_speed" => auto.turn_speed = value.parse()?,
                "intake_ms" => auto.intake_ms = value.parse()?,
                "timeout_ms" => auto.timeout_ms = value.parse()?,
                _ => return Err(ValueError::UnknownKey),
            }
        }

        Section::Buttons => {
            let port = Some(value.parse()?);
            if key == "right_bumper" {
                config.buttons.right_bumper = port;
            } else {
                let index = key
                    .strip_prefix("panel")
                    .and_then(|n| n.parse::<usize>().ok())
                    .and_then(|n| n.checked_sub(1))
                    .filter(|&i| i < PANEL_BUTTONS)
                    .ok_or(ValueError::UnknownKey)?;
                config.buttons.panel[index] = port;
            }
        }
    }
    Ok(())
}

/// Drop a trailing comment, unless the `#` sits inside a quoted string
fn strip_comment(text: &str) -> &str {
    match text.find('#') {
        Some(hash_pos) if text[..hash_pos].matches('"').count() % 2 == 0 => text[..hash_pos].trim(),
        _ => text,
    }
}

/// Split a `key = value` line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_bool(value: &str) -> Result<bool, ValueError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ValueError::Invalid),
    }
}

/// Parse `[a, b]`
fn parse_pair(value: &str) -> Result<[u8; 2], ValueError> {
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or(ValueError::Invalid)?;
    let mut items = inner.split(',').map(str::trim);
    let first = items.next().ok_or(ValueError::Invalid)?.parse()?;
    let second = items.next().ok_or(ValueError::Invalid)?.parse()?;
    if items.next().is_some() {
        return Err(ValueError::Invalid);
    }
    Ok([first, second])
}
