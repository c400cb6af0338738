//! Mesh height map
//!
//! Used by the unified and simple mesh strategies. The position is held
//! inside the probed area, and nodes that were never probed (stored as NaN)
//! count as zero so a partial mesh never poisons the correction.

use nivel_core::traits::HeightMap;

use super::grid::HeightGrid;

/// Clamped mesh interpolation over a [`HeightGrid`]
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGrid {
    grid: HeightGrid,
}

impl MeshGrid {
    pub fn new(grid: HeightGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }

    /// Number of nodes holding a probed value
    pub fn probed_nodes(&self) -> usize {
        let (cols, rows) = (self.grid.columns() as usize, self.grid.rows() as usize);
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .filter(|&(col, row)| self.grid.node(col, row).is_finite())
            .count()
    }
}

impl HeightMap for MeshGrid {
    fn z_correction(&self, x: f32, y: f32) -> f32 {
        let cell = self.grid.locate(x, y, true);
        let z = self
            .grid
            .blend(cell, |z| if z.is_finite() { z } else { 0.0 });
        if z.is_finite() {
            z
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leveling::grid::tests::ramp;

    #[test]
    fn test_interpolates_inside() {
        let mesh = MeshGrid::new(ramp());
        assert!((mesh.z_correction(50.0, 25.0) - 1.0).abs() < 1e-4);
        assert_eq!(mesh.probed_nodes(), 9);
    }

    #[test]
    fn test_holds_edge_value_outside() {
        let mesh = MeshGrid::new(ramp());
        assert!((mesh.z_correction(500.0, -500.0) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_unprobed_node_counts_as_zero() {
        let grid =
            HeightGrid::new(2, 2, (0.0, 0.0), (10.0, 10.0), &[0.4, f32::NAN, 0.4, 0.4]).unwrap();
        let mesh = MeshGrid::new(grid);
        assert_eq!(mesh.probed_nodes(), 3);

        assert!((mesh.z_correction(0.0, 0.0) - 0.4).abs() < 1e-6);
        assert!(mesh.z_correction(10.0, 0.0).abs() < 1e-6);
        assert!((mesh.z_correction(5.0, 0.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_position_gives_zero() {
        let mesh = MeshGrid::new(ramp());
        assert_eq!(mesh.z_correction(f32::NAN, 10.0), 0.0);
    }
}
