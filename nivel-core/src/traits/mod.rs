//! Hardware and collaborator traits
//!
//! These traits define the interface between the application logic
//! and board-specific or table-specific implementations.

pub mod heater;
pub mod leveling;

pub use heater::{HeaterOutput, SensorError, TemperatureSensor};
pub use leveling::{FadeScaling, HeightMap, PlanarLeveling};
