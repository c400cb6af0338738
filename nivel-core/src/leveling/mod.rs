//! Bed leveling compensation
//!
//! Selects the correction source for the active strategy and composes it
//! with fade attenuation.

pub mod fade;
pub mod resolver;
pub mod strategy;

pub use fade::FadeHeight;
pub use resolver::{
    attenuate, resolve_correction, ActiveLeveling, Correction, CorrectionResult,
    PlanarCorrection,
};
pub use strategy::LevelingStrategy;
