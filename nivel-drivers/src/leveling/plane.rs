//! Tilted bed plane
//!
//! Planar strategies fit a single plane to the probed points and rotate
//! every position into that plane's frame. The rotation is a look-at
//! matrix built from the plane normal: the Z row is the normal, the X row
//! stays in the XZ plane, and the Y row completes the frame. Positions are
//! rotated about a tilt fulcrum on the bed.

use nivel_core::leveling::LevelingStrategy;
use nivel_core::motion::Xyz;
use nivel_core::traits::PlanarLeveling;

use super::grid::HeightGrid;

/// Normal Z component below which the plane is treated as vertical
const MIN_NORMAL_Z: f32 = 1e-6;

/// Plane fitting errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaneError {
    /// Points are collinear, coincident or describe a vertical plane
    Degenerate,
    /// Fewer than three usable points
    TooFewPoints,
    /// A required grid node was never probed
    Unprobed,
}

/// Bed tilt as a rotation matrix
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaneMatrix {
    x_row: Xyz,
    y_row: Xyz,
    z_row: Xyz,
    fulcrum_x: f32,
    fulcrum_y: f32,
}

impl Default for PlaneMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PlaneMatrix {
    /// Level bed, no rotation
    pub const IDENTITY: PlaneMatrix = PlaneMatrix {
        x_row: Xyz::new(1.0, 0.0, 0.0),
        y_row: Xyz::new(0.0, 1.0, 0.0),
        z_row: Xyz::new(0.0, 0.0, 1.0),
        fulcrum_x: 0.0,
        fulcrum_y: 0.0,
    };

    /// Build the rotation for a plane with the given normal
    ///
    /// A downward normal is flipped so the frame keeps Z pointing up.
    pub fn from_normal(normal: Xyz) -> Result<Self, PlaneError> {
        let normal = if normal.z < 0.0 {
            normal.scale(-1.0)
        } else {
            normal
        };

        let z_row = normal.normalized().ok_or(PlaneError::Degenerate)?;
        if !(z_row.z > MIN_NORMAL_Z) {
            return Err(PlaneError::Degenerate);
        }

        let x_row = Xyz::new(1.0, 0.0, -z_row.x / z_row.z)
            .normalized()
            .ok_or(PlaneError::Degenerate)?;
        let y_row = z_row.cross(x_row).normalized().ok_or(PlaneError::Degenerate)?;

        Ok(Self {
            x_row,
            y_row,
            z_row,
            fulcrum_x: 0.0,
            fulcrum_y: 0.0,
        })
    }

    /// Plane through three probed points
    pub fn from_three_points(a: Xyz, b: Xyz, c: Xyz) -> Result<Self, PlaneError> {
        Self::from_normal((b - a).cross(c - a))
    }

    /// Least-squares plane `z = ax + by + d` through the given points
    ///
    /// Non-finite points are skipped.
    pub fn fit_least_squares(points: &[Xyz]) -> Result<Self, PlaneError> {
        Self::fit(|| points.iter().copied())
    }

    fn fit<I>(points: impl Fn() -> I) -> Result<Self, PlaneError>
    where
        I: Iterator<Item = Xyz>,
    {
        let usable = || points().filter(|p| p.z.is_finite());

        let n = usable().count();
        if n < 3 {
            return Err(PlaneError::TooFewPoints);
        }

        let sum = usable().fold(Xyz::ZERO, |acc, p| acc + p);
        let mean = sum.scale(1.0 / n as f32);

        let (mut sxx, mut syy, mut sxy, mut sxz, mut syz) = (0.0, 0.0, 0.0, 0.0, 0.0);
        for p in usable() {
            let d = p - mean;
            sxx += d.x * d.x;
            syy += d.y * d.y;
            sxy += d.x * d.y;
            sxz += d.x * d.z;
            syz += d.y * d.z;
        }

        let det = sxx * syy - sxy * sxy;
        if !(libm::fabsf(det) > f32::EPSILON * sxx * syy) {
            return Err(PlaneError::Degenerate);
        }

        let a = (sxz * syy - syz * sxy) / det;
        let b = (syz * sxx - sxz * sxy) / det;
        Self::from_normal(Xyz::new(-a, -b, 1.0))
    }

    /// Fit the plane a planar strategy derives from a probed grid
    ///
    /// Linear uses every probed node. Three-point uses the front-left,
    /// front-right and back-center nodes.
    pub fn from_grid(grid: &HeightGrid, strategy: LevelingStrategy) -> Result<Self, PlaneError> {
        let node = |col: usize, row: usize| {
            let (x, y) = grid.node_position(col, row);
            Xyz::new(x, y, grid.node(col, row))
        };
        let (cols, rows) = (grid.columns() as usize, grid.rows() as usize);

        match strategy {
            LevelingStrategy::ThreePoint => {
                let corners = [node(0, 0), node(cols - 1, 0), node((cols - 1) / 2, rows - 1)];
                if corners.iter().any(|p| !p.z.is_finite()) {
                    return Err(PlaneError::Unprobed);
                }
                Self::from_three_points(corners[0], corners[1], corners[2])
            }
            _ => Self::fit(|| grid.nodes()),
        }
    }

    /// Rotate about (x, y) instead of the bed origin
    pub fn with_fulcrum(mut self, x: f32, y: f32) -> Self {
        self.fulcrum_x = x;
        self.fulcrum_y = y;
        self
    }

    /// Unit normal of the bed plane
    pub fn normal(&self) -> Xyz {
        self.z_row
    }

    fn rotate(&self, v: Xyz) -> Xyz {
        self.x_row.scale(v.x) + self.y_row.scale(v.y) + self.z_row.scale(v.z)
    }
}

impl PlanarLeveling for PlaneMatrix {
    fn apply(&self, position: Xyz) -> Xyz {
        let local = Xyz::new(
            position.x - self.fulcrum_x,
            position.y - self.fulcrum_y,
            position.z,
        );
        let rotated = self.rotate(local);
        Xyz::new(
            rotated.x + self.fulcrum_x,
            rotated.y + self.fulcrum_y,
            rotated.z,
        )
    }
}
