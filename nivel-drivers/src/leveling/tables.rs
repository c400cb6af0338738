//! Leveling tables for the configured strategy
//!
//! Owns whichever table the configured strategy reads from and lends it to
//! the resolver as an [`ActiveLeveling`].

use nivel_core::config::MachineConfig;
use nivel_core::leveling::{ActiveLeveling, LevelingStrategy};

use super::bilinear::BilinearGrid;
use super::grid::{GridError, HeightGrid};
use super::mesh::MeshGrid;
use super::plane::{PlaneError, PlaneMatrix};

/// Table construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TableError {
    Grid(GridError),
    Plane(PlaneError),
}

impl From<GridError> for TableError {
    fn from(e: GridError) -> Self {
        TableError::Grid(e)
    }
}

impl From<PlaneError> for TableError {
    fn from(e: PlaneError) -> Self {
        TableError::Plane(e)
    }
}

/// Strategy together with its owned table
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LevelingTables {
    #[default]
    None,
    Linear(PlaneMatrix),
    Bilinear(BilinearGrid),
    ThreePoint(PlaneMatrix),
    UnifiedMesh(MeshGrid),
    SimpleMesh(MeshGrid),
}

impl LevelingTables {
    /// Build the table for the configured strategy from the probed mesh
    pub fn build(config: &MachineConfig) -> Result<Self, TableError> {
        let strategy = config.leveling.strategy;
        if strategy == LevelingStrategy::None {
            return Ok(LevelingTables::None);
        }

        let grid = HeightGrid::from_mesh(&config.mesh)?;
        Self::from_grid(grid, config)
    }

    /// Build from an already loaded grid, such as one restored from storage
    pub fn from_grid(grid: HeightGrid, config: &MachineConfig) -> Result<Self, TableError> {
        let leveling = &config.leveling;
        let tables = match leveling.strategy {
            LevelingStrategy::None => LevelingTables::None,
            strategy @ (LevelingStrategy::Linear | LevelingStrategy::ThreePoint) => {
                let plane = PlaneMatrix::from_grid(&grid, strategy)?
                    .with_fulcrum(leveling.fulcrum_x, leveling.fulcrum_y);
                if strategy == LevelingStrategy::Linear {
                    LevelingTables::Linear(plane)
                } else {
                    LevelingTables::ThreePoint(plane)
                }
            }
            LevelingStrategy::Bilinear => {
                LevelingTables::Bilinear(BilinearGrid::new(grid, config.mesh.extrapolate))
            }
            LevelingStrategy::UnifiedMesh => LevelingTables::UnifiedMesh(MeshGrid::new(grid)),
            LevelingStrategy::SimpleMesh => LevelingTables::SimpleMesh(MeshGrid::new(grid)),
        };
        Ok(tables)
    }

    pub fn strategy(&self) -> LevelingStrategy {
        self.active().strategy()
    }

    /// Borrow the table for the resolver
    pub fn active(&self) -> ActiveLeveling<'_> {
        match self {
            LevelingTables::None => ActiveLeveling::None,
            LevelingTables::Linear(plane) => ActiveLeveling::Linear(plane),
            LevelingTables::Bilinear(map) => ActiveLeveling::Bilinear(map),
            LevelingTables::ThreePoint(plane) => ActiveLeveling::ThreePoint(plane),
            LevelingTables::UnifiedMesh(mesh) => ActiveLeveling::UnifiedMesh(mesh),
            LevelingTables::SimpleMesh(mesh) => ActiveLeveling::SimpleMesh(mesh),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leveling::LinearFade;
    use heapless::Vec;
    use nivel_core::config::MeshConfig;
    use nivel_core::leveling::{resolve_correction, Correction, FadeHeight};
    use nivel_core::motion::Xyz;

    fn config(strategy: LevelingStrategy) -> MachineConfig {
        let mut config = MachineConfig::new();
        config.leveling.strategy = strategy;
        config.leveling.enabled = true;
        config.mesh = MeshConfig {
            columns: 2,
            rows: 2,
            spacing_x: 100.0,
            spacing_y: 100.0,
            points: Vec::from_slice(&[0.0, 0.2, 0.0, 0.2]).unwrap(),
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_every_strategy_builds_matching_table() {
        for strategy in LevelingStrategy::ALL {
            let tables = LevelingTables::build(&config(strategy)).unwrap();
            assert_eq!(tables.strategy(), strategy);
            assert_eq!(tables.active().strategy(), strategy);
        }
    }

    #[test]
    fn test_none_needs_no_mesh() {
        let mut config = MachineConfig::new();
        config.leveling.strategy = LevelingStrategy::None;
        assert_eq!(LevelingTables::build(&config), Ok(LevelingTables::None));
    }

    #[test]
    fn test_missing_mesh_is_an_error() {
        let mut config = config(LevelingStrategy::Bilinear);
        config.mesh = MeshConfig::default();
        assert_eq!(
            LevelingTables::build(&config),
            Err(TableError::Grid(GridError::TooSmall))
        );
    }

    #[test]
    fn test_bilinear_resolves_through_tables() {
        let tables = LevelingTables::build(&config(LevelingStrategy::Bilinear)).unwrap();
        let fade = FadeHeight::new(4.0).unwrap();

        let correction = resolve_correction(
            &tables.active(),
            Xyz::new(50.0, 50.0, 2.0),
            fade,
            &LinearFade,
        );
        let result = correction.scalar().unwrap();
        assert!((result.raw - 0.1).abs() < 1e-6);
        assert!((result.attenuated - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_planar_resolves_to_delta() {
        let tables = LevelingTables::build(&config(LevelingStrategy::Linear)).unwrap();
        let correction = resolve_correction(
            &tables.active(),
            Xyz::new(100.0, 0.0, 0.0),
            FadeHeight::DISABLED,
            &LinearFade,
        );
        let Correction::Planar(planar) = correction else {
            panic!("expected planar correction");
        };
        // Bed rises 0.2 mm over 100 mm along X
        assert!((planar.delta.z - 0.2).abs() < 1e-3);
    }

    #[test]
    fn test_restored_partial_grid_gives_finite_bilinear_correction() {
        let grid =
            HeightGrid::new(2, 2, (0.0, 0.0), (10.0, 10.0), &[0.1, f32::NAN, 0.1, 0.1]).unwrap();
        let mut buf = [0u8; 64];
        let used = grid.store(&mut buf).unwrap().len();
        let restored = HeightGrid::load(&buf[..used]).unwrap();

        let tables =
            LevelingTables::from_grid(restored, &config(LevelingStrategy::Bilinear)).unwrap();
        let correction = resolve_correction(
            &tables.active(),
            Xyz::new(10.0, 10.0, 0.0),
            FadeHeight::DISABLED,
            &LinearFade,
        );
        let result = correction.scalar().unwrap();
        assert!(result.raw.is_finite());
        assert!((result.raw - 0.1).abs() < 1e-6);
        assert_eq!(result.attenuated, result.raw);
    }

    #[test]
    fn test_restored_grid_builds_same_tables() {
        let config = config(LevelingStrategy::UnifiedMesh);
        let grid = HeightGrid::from_mesh(&config.mesh).unwrap();

        let mut buf = [0u8; 64];
        let used = grid.store(&mut buf).unwrap().len();
        let restored = HeightGrid::load(&buf[..used]).unwrap();

        assert_eq!(
            LevelingTables::from_grid(restored, &config),
            LevelingTables::build(&config)
        );
    }
}
