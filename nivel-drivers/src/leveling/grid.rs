//! Probed height grid
//!
//! Storage shared by the bilinear and mesh tables. Nodes are row-major with
//! row 0 at the front of the bed. The grid can be persisted to a byte
//! buffer with postcard so a probed mesh survives a restart.

use core::fmt;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use nivel_core::config::{MeshConfig, MAX_MESH_POINTS};
use nivel_core::motion::Xyz;

/// Grid construction and persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GridError {
    /// Fewer than 2 × 2 nodes
    TooSmall,
    /// More nodes than the grid can hold
    TooManyPoints,
    /// Point count does not match columns × rows
    DimensionMismatch,
    /// Spacing is zero, negative or not finite
    InvalidSpacing,
    /// Output buffer too small
    Serialize,
    /// Stored bytes are not a grid
    Deserialize,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            GridError::TooSmall => "grid needs at least 2 x 2 nodes",
            GridError::TooManyPoints => "too many grid nodes",
            GridError::DimensionMismatch => "point count does not match grid size",
            GridError::InvalidSpacing => "grid spacing must be positive",
            GridError::Serialize => "buffer too small for grid",
            GridError::Deserialize => "stored bytes are not a grid",
        };
        f.write_str(msg)
    }
}

/// Grid cell containing a point, with the fractional position inside it
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cell {
    pub col: usize,
    pub row: usize,
    pub tx: f32,
    pub ty: f32,
}

/// Rectangular grid of probed Z offsets
///
/// Deserializing goes through the same checks as [`HeightGrid::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridFields")]
pub struct HeightGrid {
    columns: u8,
    rows: u8,
    origin_x: f32,
    origin_y: f32,
    spacing_x: f32,
    spacing_y: f32,
    points: Vec<f32, MAX_MESH_POINTS>,
}

/// Stored layout of a [`HeightGrid`] before validation
#[derive(Deserialize)]
struct GridFields {
    columns: u8,
    rows: u8,
    origin_x: f32,
    origin_y: f32,
    spacing_x: f32,
    spacing_y: f32,
    points: Vec<f32, MAX_MESH_POINTS>,
}

impl TryFrom<GridFields> for HeightGrid {
    type Error = GridError;

    fn try_from(fields: GridFields) -> Result<Self, GridError> {
        let grid = HeightGrid {
            columns: fields.columns,
            rows: fields.rows,
            origin_x: fields.origin_x,
            origin_y: fields.origin_y,
            spacing_x: fields.spacing_x,
            spacing_y: fields.spacing_y,
            points: fields.points,
        };
        grid.validate()?;
        Ok(grid)
    }
}

impl HeightGrid {
    /// Build a grid from explicit geometry and row-major points
    pub fn new(
        columns: u8,
        rows: u8,
        origin: (f32, f32),
        spacing: (f32, f32),
        points: &[f32],
    ) -> Result<Self, GridError> {
        let points = Vec::from_slice(points).map_err(|_| GridError::TooManyPoints)?;
        let grid = Self {
            columns,
            rows,
            origin_x: origin.0,
            origin_y: origin.1,
            spacing_x: spacing.0,
            spacing_y: spacing.1,
            points,
        };
        grid.validate()?;
        Ok(grid)
    }

    /// Build a grid from the `[mesh]` configuration section
    pub fn from_mesh(mesh: &MeshConfig) -> Result<Self, GridError> {
        Self::new(
            mesh.columns,
            mesh.rows,
            (mesh.origin_x, mesh.origin_y),
            (mesh.spacing_x, mesh.spacing_y),
            &mesh.points,
        )
    }

    fn validate(&self) -> Result<(), GridError> {
        if self.columns < 2 || self.rows < 2 {
            return Err(GridError::TooSmall);
        }
        let count = self.columns as usize * self.rows as usize;
        if count > MAX_MESH_POINTS {
            return Err(GridError::TooManyPoints);
        }
        if count != self.points.len() {
            return Err(GridError::DimensionMismatch);
        }
        let spacing_ok = |s: f32| s.is_finite() && s > 0.0;
        if !spacing_ok(self.spacing_x) || !spacing_ok(self.spacing_y) {
            return Err(GridError::InvalidSpacing);
        }
        Ok(())
    }

    pub fn columns(&self) -> u8 {
        self.columns
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Z offset stored at a node
    pub fn node(&self, col: usize, row: usize) -> f32 {
        self.points[row * self.columns as usize + col]
    }

    /// Every node as a bed position, row by row
    pub fn nodes(&self) -> impl Iterator<Item = Xyz> + '_ {
        let columns = self.columns as usize;
        self.points.iter().enumerate().map(move |(i, &z)| {
            let (x, y) = self.node_position(i % columns, i / columns);
            Xyz::new(x, y, z)
        })
    }

    /// Replace unprobed (non-finite) nodes with estimates
    ///
    /// Each pass gives an unprobed node the mean of its probed orthogonal
    /// neighbours, until the gaps are closed. A grid with no probed node
    /// at all becomes flat at zero.
    pub fn fill_unprobed(&mut self) {
        let (cols, rows) = (self.columns as usize, self.rows as usize);

        loop {
            let mut filled = false;
            for row in 0..rows {
                for col in 0..cols {
                    if self.node(col, row).is_finite() {
                        continue;
                    }
                    let neighbours = [
                        (col.wrapping_sub(1), row),
                        (col + 1, row),
                        (col, row.wrapping_sub(1)),
                        (col, row + 1),
                    ];
                    let (sum, count) = neighbours
                        .iter()
                        .filter(|&&(c, r)| c < cols && r < rows)
                        .map(|&(c, r)| self.node(c, r))
                        .filter(|z| z.is_finite())
                        .fold((0.0f32, 0u8), |(sum, n), z| (sum + z, n + 1));
                    if count > 0 {
                        self.points[row * cols + col] = sum / count as f32;
                        filled = true;
                    }
                }
            }
            if !filled {
                break;
            }
        }

        for z in self.points.iter_mut().filter(|z| !z.is_finite()) {
            *z = 0.0;
        }
    }

    /// Bed coordinates of a node
    pub fn node_position(&self, col: usize, row: usize) -> (f32, f32) {
        (
            self.origin_x + col as f32 * self.spacing_x,
            self.origin_y + row as f32 * self.spacing_y,
        )
    }

    /// Lowest and highest finite node values
    pub fn range(&self) -> Option<(f32, f32)> {
        self.points
            .iter()
            .copied()
            .filter(|z| z.is_finite())
            .fold(None, |acc, z| match acc {
                None => Some((z, z)),
                Some((lo, hi)) => Some((lo.min(z), hi.max(z))),
            })
    }

    /// Locate the cell for (x, y)
    ///
    /// Points outside the grid map to the nearest edge cell. With `clamp`
    /// the fractional position is limited to the cell; without it the edge
    /// cell is extended linearly.
    pub(crate) fn locate(&self, x: f32, y: f32, clamp: bool) -> Cell {
        let (col, tx) = axis_cell(x - self.origin_x, self.spacing_x, self.columns, clamp);
        let (row, ty) = axis_cell(y - self.origin_y, self.spacing_y, self.rows, clamp);
        Cell { col, row, tx, ty }
    }

    /// Bilinear blend of the four corners of `cell`
    pub(crate) fn blend(&self, cell: Cell, corner: impl Fn(f32) -> f32) -> f32 {
        let z00 = corner(self.node(cell.col, cell.row));
        let z10 = corner(self.node(cell.col + 1, cell.row));
        let z01 = corner(self.node(cell.col, cell.row + 1));
        let z11 = corner(self.node(cell.col + 1, cell.row + 1));

        let front = lerp(z00, z10, cell.tx);
        let back = lerp(z01, z11, cell.tx);
        lerp(front, back, cell.ty)
    }

    /// Serialize into `buf`, returning the used prefix
    pub fn store<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], GridError> {
        postcard::to_slice(self, buf).map_err(|_| GridError::Serialize)
    }

    /// Deserialize and re-validate a stored grid
    pub fn load(bytes: &[u8]) -> Result<Self, GridError> {
        let fields: GridFields =
            postcard::from_bytes(bytes).map_err(|_| GridError::Deserialize)?;
        HeightGrid::try_from(fields)
    }
}

fn axis_cell(offset: f32, spacing: f32, count: u8, clamp: bool) -> (usize, f32) {
    let last = count as usize - 2;
    let pos = offset / spacing;
    let cell = libm::floorf(pos);

    let index = if cell < 0.0 {
        0
    } else if cell as usize > last {
        last
    } else {
        cell as usize
    };

    let t = pos - index as f32;
    if clamp {
        (index, t.clamp(0.0, 1.0))
    } else {
        (index, t)
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
