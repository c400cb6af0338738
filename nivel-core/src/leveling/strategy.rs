//! Leveling strategy selection

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bed leveling strategy
///
/// Exactly one strategy is active at a time. New strategies are added as
/// new variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LevelingStrategy {
    /// No compensation
    #[default]
    None,
    /// Least-squares plane fit over a probe grid
    Linear,
    /// Bilinear interpolation over a probed height map
    Bilinear,
    /// Plane through three probe points
    ThreePoint,
    /// Unified mesh leveling
    UnifiedMesh,
    /// Simple (manual) mesh leveling
    SimpleMesh,
}

impl LevelingStrategy {
    /// All strategies
    pub const ALL: [LevelingStrategy; 6] = [
        LevelingStrategy::None,
        LevelingStrategy::Linear,
        LevelingStrategy::Bilinear,
        LevelingStrategy::ThreePoint,
        LevelingStrategy::UnifiedMesh,
        LevelingStrategy::SimpleMesh,
    ];

    /// Planar strategies tilt the coordinate frame instead of adding a Z offset
    pub const fn is_planar(&self) -> bool {
        matches!(self, LevelingStrategy::Linear | LevelingStrategy::ThreePoint)
    }

    /// Strategies that use a height map or mesh lookup
    pub const fn uses_height_map(&self) -> bool {
        matches!(
            self,
            LevelingStrategy::Bilinear | LevelingStrategy::UnifiedMesh | LevelingStrategy::SimpleMesh
        )
    }

    /// Short name used in diagnostics
    pub const fn label(&self) -> &'static str {
        match self {
            LevelingStrategy::None => "NONE",
            LevelingStrategy::Linear => "LINEAR",
            LevelingStrategy::Bilinear => "BILINEAR",
            LevelingStrategy::ThreePoint => "3POINT",
            LevelingStrategy::UnifiedMesh => "UBL",
            LevelingStrategy::SimpleMesh => "MBL",
        }
    }

    /// Parse a configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" | "NONE" => Some(LevelingStrategy::None),
            "linear" | "LINEAR" => Some(LevelingStrategy::Linear),
            "bilinear" | "BILINEAR" => Some(LevelingStrategy::Bilinear),
            "3point" | "3POINT" | "three_point" => Some(LevelingStrategy::ThreePoint),
            "ubl" | "UBL" | "unified_mesh" => Some(LevelingStrategy::UnifiedMesh),
            "mbl" | "MBL" | "simple_mesh" | "mesh" => Some(LevelingStrategy::SimpleMesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_planar_and_height_map_partition() {
        for strategy in LevelingStrategy::ALL {
            let planar = strategy.is_planar();
            let mapped = strategy.uses_height_map();
            assert!(!(planar && mapped), "{:?}", strategy);
            if strategy == LevelingStrategy::None {
                assert!(!planar && !mapped);
            } else {
                assert!(planar || mapped, "{:?}", strategy);
            }
        }
    }

    #[test]
    fn test_label_round_trips_through_from_name() {
        for strategy in LevelingStrategy::ALL {
            assert_eq!(LevelingStrategy::from_name(strategy.label()), Some(strategy));
        }
    }

    #[test]
    fn test_from_name_aliases() {
        assert_eq!(
            LevelingStrategy::from_name("three_point"),
            Some(LevelingStrategy::ThreePoint)
        );
        assert_eq!(
            LevelingStrategy::from_name("mesh"),
            Some(LevelingStrategy::SimpleMesh)
        );
        assert_eq!(LevelingStrategy::from_name("spline"), None);
    }
}
