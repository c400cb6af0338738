//! Bilinear height map
//!
//! Interpolates the probed grid cell by cell. Outside the probed area the
//! edge cells are either extended linearly or held at the edge value.
//! Unprobed nodes are estimated from their neighbours when the map is built.

use nivel_core::traits::HeightMap;

use super::grid::HeightGrid;

/// Bilinear interpolation over a [`HeightGrid`]
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearGrid {
    grid: HeightGrid,
    extrapolate: bool,
}

impl BilinearGrid {
    pub fn new(mut grid: HeightGrid, extrapolate: bool) -> Self {
        grid.fill_unprobed();
        Self { grid, extrapolate }
    }

    pub fn grid(&self) -> &HeightGrid {
        &self.grid
    }
}

impl HeightMap for BilinearGrid {
    fn z_correction(&self, x: f32, y: f32) -> f32 {
        let cell = self.grid.locate(x, y, !self.extrapolate);
        self.grid.blend(cell, |z| z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leveling::grid::tests::ramp;
    use proptest::prelude::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_exact_at_nodes() {
        let map = BilinearGrid::new(ramp(), true);
        let grid = map.grid().clone();
        for row in 0..3 {
            for col in 0..3 {
                let (x, y) = grid.node_position(col, row);
                assert!(close(map.z_correction(x, y), grid.node(col, row)));
            }
        }
    }

    #[test]
    fn test_cell_center() {
        let map = BilinearGrid::new(ramp(), true);
        // z = 0.01 * 25 + 0.02 * 75
        assert!(close(map.z_correction(25.0, 75.0), 1.75));
    }

    #[test]
    fn test_extrapolates_beyond_edges() {
        let map = BilinearGrid::new(ramp(), true);
        assert!(close(map.z_correction(-10.0, 0.0), -0.1));
        assert!(close(map.z_correction(120.0, 0.0), 1.2));
    }

    #[test]
    fn test_clamps_when_extrapolation_off() {
        let map = BilinearGrid::new(ramp(), false);
        assert!(close(map.z_correction(-10.0, 0.0), 0.0));
        assert!(close(map.z_correction(120.0, 120.0), 3.0));
    }

    #[test]
    fn test_unprobed_node_is_estimated() {
        let grid =
            HeightGrid::new(2, 2, (0.0, 0.0), (10.0, 10.0), &[0.1, f32::NAN, 0.1, 0.1]).unwrap();
        let map = BilinearGrid::new(grid, true);

        assert!(map.grid().nodes().all(|p| p.z.is_finite()));
        for (x, y) in [(10.0, 0.0), (5.0, 5.0), (10.0, 10.0), (40.0, -30.0)] {
            assert!(close(map.z_correction(x, y), 0.1));
        }
    }

    proptest! {
        #[test]
        fn prop_planar_grid_is_reproduced(x in 0.0f32..100.0, y in 0.0f32..100.0) {
            let map = BilinearGrid::new(ramp(), true);
            let expected = 0.01 * x + 0.02 * y;
            prop_assert!(close(map.z_correction(x, y), expected));
        }

        #[test]
        fn prop_clamped_stays_within_node_range(x in -200.0f32..300.0, y in -200.0f32..300.0) {
            let map = BilinearGrid::new(ramp(), false);
            let z = map.z_correction(x, y);
            prop_assert!((-1e-4..=3.0 + 1e-4).contains(&z));
        }
    }
}
