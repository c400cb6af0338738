//! Probe offset placement
//!
//! Describes where the probe sits relative to the tool, one axis at a time,
//! for diagnostic output. Pure; never used in correction math.

use crate::motion::Xyz;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Label vocabulary for the Y axis
///
/// Arm-based kinematics describe Y placement as distal/proximal rather than
/// behind/in front. Which set applies is machine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LabelSet {
    #[default]
    Cartesian,
    Scara,
}

/// X placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HorizontalPlacement {
    Right,
    Left,
    Aligned,
}

impl HorizontalPlacement {
    pub const fn label(&self) -> &'static str {
        match self {
            HorizontalPlacement::Right => "right of tool",
            HorizontalPlacement::Left => "left of tool",
            HorizontalPlacement::Aligned => "aligned in X",
        }
    }
}

/// Y placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LateralPlacement {
    Behind,
    InFront,
    /// X and Y both zero
    Centered,
    /// Y zero, X nonzero
    CenteredOnY,
}

impl LateralPlacement {
    pub const fn label(&self, set: LabelSet) -> &'static str {
        match (self, set) {
            (LateralPlacement::Behind, LabelSet::Cartesian) => "behind tool",
            (LateralPlacement::Behind, LabelSet::Scara) => "distal of tool",
            (LateralPlacement::InFront, LabelSet::Cartesian) => "in front of tool",
            (LateralPlacement::InFront, LabelSet::Scara) => "proximal of tool",
            (LateralPlacement::Centered, _) => "centered",
            (LateralPlacement::CenteredOnY, _) => "centered on Y",
        }
    }
}

/// Z placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VerticalPlacement {
    Below,
    Above,
    Level,
}

impl VerticalPlacement {
    pub const fn label(&self) -> &'static str {
        match self {
            VerticalPlacement::Below => "below nozzle plane",
            VerticalPlacement::Above => "above nozzle plane",
            VerticalPlacement::Level => "level with nozzle",
        }
    }
}

/// Classified probe offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OffsetPlacement {
    pub horizontal: HorizontalPlacement,
    pub lateral: LateralPlacement,
    pub vertical: VerticalPlacement,
}

impl OffsetPlacement {
    /// Labels in (horizontal, lateral, vertical) order
    pub const fn labels(&self, set: LabelSet) -> [&'static str; 3] {
        [
            self.horizontal.label(),
            self.lateral.label(set),
            self.vertical.label(),
        ]
    }
}

/// Classify a probe offset axis by axis
pub fn classify_offset(offset: Xyz) -> OffsetPlacement {
    let horizontal = if offset.x > 0.0 {
        HorizontalPlacement::Right
    } else if offset.x < 0.0 {
        HorizontalPlacement::Left
    } else {
        HorizontalPlacement::Aligned
    };

    let lateral = if offset.y > 0.0 {
        LateralPlacement::Behind
    } else if offset.y < 0.0 {
        LateralPlacement::InFront
    } else if offset.x != 0.0 {
        LateralPlacement::CenteredOnY
    } else {
        LateralPlacement::Centered
    };

    let vertical = if offset.z < 0.0 {
        VerticalPlacement::Below
    } else if offset.z > 0.0 {
        VerticalPlacement::Above
    } else {
        VerticalPlacement::Level
    };

    OffsetPlacement {
        horizontal,
        lateral,
        vertical,
    }
}
