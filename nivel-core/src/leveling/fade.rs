//! Fade height

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Height (mm) above which leveling correction is fully faded out
///
/// Always finite and non-negative. Zero disables fading.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FadeHeight(f32);

impl FadeHeight {
    /// Fading disabled
    pub const DISABLED: FadeHeight = FadeHeight(0.0);

    /// Create a fade height, rejecting negative and non-finite values
    pub fn new(mm: f32) -> Option<Self> {
        if mm.is_finite() && mm >= 0.0 {
            Some(Self(mm))
        } else {
            None
        }
    }

    /// Height in millimetres
    pub const fn mm(&self) -> f32 {
        self.0
    }

    /// Check if fading is active
    pub fn is_enabled(&self) -> bool {
        self.0 > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid() {
        assert!(FadeHeight::new(-0.1).is_none());
        assert!(FadeHeight::new(f32::NAN).is_none());
        assert!(FadeHeight::new(f32::INFINITY).is_none());
    }

    #[test]
    fn test_zero_disables() {
        let fade = FadeHeight::new(0.0).unwrap();
        assert_eq!(fade, FadeHeight::DISABLED);
        assert!(!fade.is_enabled());

        let fade = FadeHeight::new(10.0).unwrap();
        assert!(fade.is_enabled());
        assert_eq!(fade.mm(), 10.0);
    }
}
