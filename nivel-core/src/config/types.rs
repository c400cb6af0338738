//! Configuration type definitions
//!
//! These types represent the machine configuration relevant to leveling and
//! thermal protection.

use heapless::Vec;

use super::parse::ParseError;
use crate::leveling::{FadeHeight, LevelingStrategy};
use crate::motion::Xyz;
use crate::probe::{MachineKind, ProbeKind};
use crate::safety::monitor::DEFAULT_MAX_TEMP_C;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Maximum mesh nodes (10 × 10)
pub const MAX_MESH_POINTS: usize = 100;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Text could not be parsed
    Parse(ParseError),
    /// Mesh needs at least 2 × 2 nodes for the active strategy
    MeshDimensions,
    /// Mesh spacing must be positive
    MeshSpacing,
    /// Number of mesh points does not match columns × rows
    MeshPoints,
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        ConfigError::Parse(e)
    }
}

/// Probe configuration
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProbeConfig {
    /// Probe type
    pub kind: ProbeKind,
    /// Probe position relative to the nozzle (mm)
    pub offset: Xyz,
}

/// Leveling configuration
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelingConfig {
    /// Active strategy
    pub strategy: LevelingStrategy,
    /// Whether compensation is applied to moves
    pub enabled: bool,
    /// Fade height (0 = no fade)
    pub fade_height: FadeHeight,
    /// Pivot of the planar tilt (X, mm)
    pub fulcrum_x: f32,
    /// Pivot of the planar tilt (Y, mm)
    pub fulcrum_y: f32,
}

/// Probed mesh geometry and values
///
/// Points are row-major: index = row × columns + column, row 0 at the front.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshConfig {
    /// Nodes along X
    pub columns: u8,
    /// Nodes along Y
    pub rows: u8,
    /// X of the first column (mm)
    pub origin_x: f32,
    /// Y of the first row (mm)
    pub origin_y: f32,
    /// Distance between columns (mm)
    pub spacing_x: f32,
    /// Distance between rows (mm)
    pub spacing_y: f32,
    /// Extrapolate beyond the probed area instead of clamping to the edge
    pub extrapolate: bool,
    /// Measured Z offsets (mm)
    pub points: Vec<f32, MAX_MESH_POINTS>,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            columns: 0,
            rows: 0,
            origin_x: 0.0,
            origin_y: 0.0,
            spacing_x: 0.0,
            spacing_y: 0.0,
            extrapolate: true,
            points: Vec::new(),
        }
    }
}

impl MeshConfig {
    /// Number of nodes the geometry calls for
    pub fn node_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Check geometry and point count
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.columns < 2 || self.rows < 2 || self.node_count() > MAX_MESH_POINTS {
            return Err(ConfigError::MeshDimensions);
        }
        if !(self.spacing_x > 0.0 && self.spacing_y > 0.0) {
            return Err(ConfigError::MeshSpacing);
        }
        if self.points.len() != self.node_count() {
            return Err(ConfigError::MeshPoints);
        }
        Ok(())
    }
}

/// Thermal protection configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThermalConfig {
    /// Maximum allowed temperature (°C)
    pub max_temp_c: i16,
    /// Thermistor pull-up resistor (ohms)
    pub pullup_ohms: u32,
}

impl Default for ThermalConfig {
    fn default() -> Self {
        Self {
            max_temp_c: DEFAULT_MAX_TEMP_C,
            pullup_ohms: 4700,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineConfig {
    /// Format version
    pub version: u8,
    /// Kinematics family
    pub machine: MachineKind,
    pub probe: ProbeConfig,
    pub leveling: LevelingConfig,
    pub mesh: MeshConfig,
    pub thermal: ThermalConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineConfig {
    /// Create a configuration with no leveling and default thermal limits
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            machine: MachineKind::default(),
            probe: ProbeConfig::default(),
            leveling: LevelingConfig::default(),
            mesh: MeshConfig::default(),
            thermal: ThermalConfig::default(),
        }
    }

    /// Check cross-section invariants
    ///
    /// Every strategy other than `None` builds its table from the mesh, so
    /// the mesh must be complete whenever leveling is configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leveling.strategy != LevelingStrategy::None {
            self.mesh.validate()?;
        }
        Ok(())
    }
}
