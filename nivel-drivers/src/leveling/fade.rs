//! Linear fade
//!
//! Full correction at the bed, tapering linearly to nothing at the fade
//! height.

use nivel_core::leveling::FadeHeight;
use nivel_core::traits::FadeScaling;

/// Linear taper from 1 at Z = 0 to 0 at the fade height
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearFade;

impl FadeScaling for LinearFade {
    fn scale(&self, z: f32, fade_height: FadeHeight) -> f32 {
        if !fade_height.is_enabled() {
            return 1.0;
        }
        let height = fade_height.mm();
        if z >= height {
            return 0.0;
        }
        // Below the bed still gets the full correction
        (1.0 - z / height).clamp(0.0, 1.0)
    }
}
