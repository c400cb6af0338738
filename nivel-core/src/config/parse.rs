//! Simple TOML parser for machine configuration
//!
//! This is a minimal, allocation-free parser that handles only the subset
//! needed for Nivel configuration. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, float, boolean)
//! - [section] headers
//! - Float arrays, which may span several lines: points = [0.1, 0.2, ...]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings
//! - Inline tables
//! - Dotted keys
//!
//! Unknown keys are ignored; unknown sections are an error.

use super::types::{ConfigError, MachineConfig};
use crate::leveling::{FadeHeight, LevelingStrategy};
use crate::probe::{MachineKind, ProbeKind};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Invalid value for a known key
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Array still open at end of input
    UnterminatedArray,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Machine,
    Probe,
    Leveling,
    Mesh,
    Thermal,
}

/// Parse TOML configuration into MachineConfig
///
/// Does not validate cross-section invariants; see [`load_config`].
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::new();
    let mut section = Section::Root;
    // Set while a multi-line `points = [` array is open
    let mut in_points = false;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if in_points {
            in_points = push_points(line, &mut config)?;
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        // Parse key = value
        if let Some((key, value)) = parse_key_value(line) {
            if section == Section::Mesh && key == "points" {
                let body = value.strip_prefix('[').ok_or(ParseError::InvalidValue)?;
                config.mesh.points.clear();
                in_points = push_points(body, &mut config)?;
            } else {
                apply_value(section, key, value, &mut config)?;
            }
        }
    }

    if in_points {
        return Err(ParseError::UnterminatedArray);
    }

    Ok(config)
}

/// Parse and validate a configuration
pub fn load_config(input: &str) -> Result<MachineConfig, ConfigError> {
    let config = parse_config(input)?;
    config.validate()?;
    Ok(config)
}

/// Parse section header like "leveling" or "mesh"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "machine" => Ok(Section::Machine),
        "probe" => Ok(Section::Probe),
        "leveling" => Ok(Section::Leveling),
        "mesh" => Ok(Section::Mesh),
        "thermal" => Ok(Section::Thermal),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Remove a trailing comment, leaving `#` inside strings alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Append array items from `body` to the mesh points
///
/// Returns true while the array is still open (no closing bracket yet).
fn push_points(body: &str, config: &mut MachineConfig) -> Result<bool, ParseError> {
    let (items, open) = match body.find(']') {
        Some(end) => {
            if !body[end + 1..].trim().is_empty() {
                return Err(ParseError::InvalidValue);
            }
            (&body[..end], false)
        }
        None => (body, true),
    };

    for item in items.split(',') {
        let item = item.trim();
        if item.is_empty() {
            continue;
        }
        let value = parse_float(item)?;
        config
            .mesh
            .points
            .push(value)
            .map_err(|_| ParseError::TooManyItems)?;
    }

    Ok(open)
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a finite float value
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let v: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a fade height, which must be non-negative
fn parse_fade_height(value: &str) -> Result<FadeHeight, ParseError> {
    FadeHeight::new(parse_float(value)?).ok_or(ParseError::InvalidValue)
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => match key {
            "version" => config.version = parse_int(value)?,
            _ => {}
        },
        Section::Machine => match key {
            "kind" => {
                config.machine =
                    MachineKind::from_name(parse_string(value)).ok_or(ParseError::InvalidValue)?
            }
            _ => {}
        },
        Section::Probe => {
            let p = &mut config.probe;
            match key {
                "kind" => {
                    p.kind =
                        ProbeKind::from_name(parse_string(value)).ok_or(ParseError::InvalidValue)?
                }
                "offset_x" => p.offset.x = parse_float(value)?,
                "offset_y" => p.offset.y = parse_float(value)?,
                "offset_z" => p.offset.z = parse_float(value)?,
                _ => {}
            }
        }
        Section::Leveling => {
            let l = &mut config.leveling;
            match key {
                "strategy" => {
                    l.strategy = LevelingStrategy::from_name(parse_string(value))
                        .ok_or(ParseError::InvalidValue)?
                }
                "enabled" => l.enabled = parse_bool(value)?,
                "fade_height" => l.fade_height = parse_fade_height(value)?,
                "fulcrum_x" => l.fulcrum_x = parse_float(value)?,
                "fulcrum_y" => l.fulcrum_y = parse_float(value)?,
                _ => {}
            }
        }
        Section::Mesh => {
            let m = &mut config.mesh;
            match key {
                "columns" => m.columns = parse_int(value)?,
                "rows" => m.rows = parse_int(value)?,
                "origin_x" => m.origin_x = parse_float(value)?,
                "origin_y" => m.origin_y = parse_float(value)?,
                "spacing_x" => m.spacing_x = parse_float(value)?,
                "spacing_y" => m.spacing_y = parse_float(value)?,
                "extrapolate" => m.extrapolate = parse_bool(value)?,
                _ => {}
            }
        }
        Section::Thermal => {
            let t = &mut config.thermal;
            match key {
                "max_temp" => t.max_temp_c = parse_int(value)?,
                "pullup_ohms" => t.pullup_ohms = parse_int(value)?,
                _ => {}
            }
        }
    }

    Ok(())
}
