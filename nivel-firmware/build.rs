//! Build script for nivel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

const STRATEGIES: &[&str] = &[
    "none",
    "linear",
    "bilinear",
    "3point",
    "three_point",
    "ubl",
    "unified_mesh",
    "mbl",
    "simple_mesh",
    "mesh",
];
const PROBES: &[&str] = &[
    "none",
    "manual",
    "fix_mounted",
    "fixed",
    "bltouch",
    "servo",
    "touch_mi",
    "sled",
    "allen_key",
    "solenoid",
];
const MACHINES: &[&str] = &["cartesian", "core", "corexy", "delta", "scara"];
const MAX_MESH_POINTS: i64 = 100;

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

/// Validate machine.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");
    if !config_path.exists() {
        fail("machine.toml not found", &["Create one in the nivel-firmware directory.".into()]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read machine.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in machine.toml",
            &e.to_string().lines().map(String::from).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_names(&config, &mut errors);
    validate_leveling(&config, &mut errors);
    validate_thermal(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid machine.toml", &errors);
    }

    println!("cargo:warning=machine.toml validated successfully");
}

/// Print a boxed error and abort the build
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            let truncated = if line.len() > 62 {
                format!("{}...", &line[..59])
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Integer(i) => Some(*i as f64),
        toml::Value::Float(f) => Some(*f),
        _ => None,
    }
}

/// Check enumerated names against the values the firmware parser accepts
fn validate_names(config: &toml::Value, errors: &mut Vec<String>) {
    let checks = [
        ("machine", "kind", MACHINES),
        ("probe", "kind", PROBES),
        ("leveling", "strategy", STRATEGIES),
    ];

    for (section, key, allowed) in checks {
        match get(config, section, key) {
            None => {}
            Some(toml::Value::String(name)) if allowed.contains(&name.as_str()) => {}
            Some(other) => errors.push(format!(
                "[{}] {} = {} is not one of: {}",
                section,
                key,
                other,
                allowed.join(", ")
            )),
        }
    }
}

/// A strategy other than none needs a complete mesh
fn validate_leveling(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(fade) = get(config, "leveling", "fade_height") {
        if !number(fade).is_some_and(|f| f >= 0.0) {
            errors.push("[leveling] fade_height must be a number >= 0".into());
        }
    }

    let strategy = get(config, "leveling", "strategy")
        .and_then(|s| s.as_str())
        .unwrap_or("none");
    if strategy == "none" {
        return;
    }

    let Some(mesh) = config.get("mesh") else {
        errors.push(format!("strategy '{}' requires a [mesh] section", strategy));
        return;
    };

    let dim = |key: &str| mesh.get(key).and_then(|v| v.as_integer()).unwrap_or(0);
    let (columns, rows) = (dim("columns"), dim("rows"));
    if columns < 2 || rows < 2 || columns * rows > MAX_MESH_POINTS {
        errors.push(format!(
            "[mesh] needs 2..=10 columns and rows, at most {} nodes",
            MAX_MESH_POINTS
        ));
    }

    for key in ["spacing_x", "spacing_y"] {
        if !mesh.get(key).and_then(number).is_some_and(|s| s > 0.0) {
            errors.push(format!("[mesh] {} must be positive", key));
        }
    }

    match mesh.get("points").and_then(|p| p.as_array()) {
        Some(points) => {
            if points.len() as i64 != columns * rows {
                errors.push(format!(
                    "[mesh] has {} points, expected {} x {}",
                    points.len(),
                    columns,
                    rows
                ));
            }
            if points.iter().any(|p| number(p).is_none()) {
                errors.push("[mesh] points must all be numbers".into());
            }
        }
        None => errors.push("[mesh] missing 'points' array".into()),
    }
}

fn validate_thermal(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(max) = get(config, "thermal", "max_temp") {
        if !max.as_integer().is_some_and(|t| (0..=500).contains(&t)) {
            errors.push("[thermal] max_temp must be 0-500".into());
        }
    }
}
