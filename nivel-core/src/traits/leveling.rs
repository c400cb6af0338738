//! Leveling table collaborator traits
//!
//! The resolver never interpolates on its own. It asks whichever table
//! belongs to the active strategy and composes the answer with the fade
//! function.

use crate::leveling::FadeHeight;
use crate::motion::Xyz;

/// Scalar Z lookup over the bed surface
///
/// Implemented by bilinear height maps and mesh grids. Must return a
/// finite value for any (x, y) inside the configured bed area.
pub trait HeightMap {
    /// Z offset of the bed surface at (x, y), in millimetres
    fn z_correction(&self, x: f32, y: f32) -> f32;
}

/// Plane-fit compensation
///
/// Planar strategies tilt the whole coordinate frame rather than adding a
/// Z offset, so they transform a full position.
pub trait PlanarLeveling {
    /// Map a nominal position onto the tilted bed frame
    fn apply(&self, position: Xyz) -> Xyz;
}

/// Fade attenuation as a function of height
pub trait FadeScaling {
    /// Factor to apply to the raw correction at height `z`
    ///
    /// Implementations should return 1 at the bed, decrease towards 0 as
    /// `z` approaches `fade_height`, and return 0 at or above it. The
    /// resolver clamps the result to [0, 1] regardless.
    fn scale(&self, z: f32, fade_height: FadeHeight) -> f32;
}
