//! Build script for baton-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Checks robot.toml against this board's channel counts at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Motor channels wired on the board (see src/board.rs)
const MOTOR_CHANNELS: i64 = 10;

/// Valve channels wired on the board (see src/board.rs)
const VALVE_CHANNELS: i64 = 2;

/// Station controller ports (see src/board.rs)
const PANEL_PORT: i64 = 0;
const GAMEPAD_PORT: i64 = 1;

const CONFIG_PATH: &str = "../baton-robot/robot.toml";

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate robot.toml at compile time
///
/// Full validation happens again at boot. This pass only catches mistakes
/// the robot crate cannot see: channels this board does not have.
fn validate_config() {
    println!("cargo:rerun-if-changed={}", CONFIG_PATH);

    let config_path = Path::new(CONFIG_PATH);
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read baton-robot/robot.toml                    ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in robot.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_ports(&config, &mut errors);
    validate_controllers(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: robot.toml does not fit this board                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&errors.join("\n"))
        );
    }

    println!("cargo:warning=robot.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Collect integer port numbers from a scalar or an array value
fn port_numbers(value: &toml::Value) -> Vec<i64> {
    match value {
        toml::Value::Integer(port) => vec![*port],
        toml::Value::Array(items) => items.iter().filter_map(|item| item.as_integer()).collect(),
        _ => Vec::new(),
    }
}

fn validate_ports(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(ports) = config.get("ports").and_then(|p| p.as_table()) else {
        errors.push("missing [ports] section".to_string());
        return;
    };

    for (key, value) in ports {
        let limit = if key.starts_with("climb_") {
            VALVE_CHANNELS
        } else {
            MOTOR_CHANNELS
        };
        for port in port_numbers(value) {
            if !(0..limit).contains(&port) {
                errors.push(format!(
                    "ports.{} = {}: board has channels 0..{}",
                    key,
                    port,
                    limit - 1
                ));
            }
        }
    }
}

fn validate_controllers(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(controllers) = config.get("controllers").and_then(|c| c.as_table()) else {
        // Defaults match the station layout
        return;
    };

    for (key, expected) in [("panel", PANEL_PORT), ("gamepad", GAMEPAD_PORT)] {
        if let Some(port) = controllers.get(key).and_then(|v| v.as_integer()) {
            if port != expected {
                errors.push(format!(
                    "controllers.{} = {}: station sends it on port {}",
                    key, port, expected
                ));
            }
        }
    }
}
