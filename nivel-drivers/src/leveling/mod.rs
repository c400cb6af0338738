//! Leveling tables
//!
//! Concrete [`HeightMap`](nivel_core::traits::HeightMap),
//! [`PlanarLeveling`](nivel_core::traits::PlanarLeveling) and
//! [`FadeScaling`](nivel_core::traits::FadeScaling) implementations, all
//! built from the probed grid.

pub mod bilinear;
pub mod fade;
pub mod grid;
pub mod mesh;
pub mod plane;
pub mod tables;

pub use bilinear::BilinearGrid;
pub use fade::LinearFade;
pub use grid::{GridError, HeightGrid};
pub use mesh::MeshGrid;
pub use plane::{PlaneError, PlaneMatrix};
pub use tables::{LevelingTables, TableError};
