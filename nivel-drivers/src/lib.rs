//! Hardware and table implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in nivel-core:
//!
//! - Leveling tables (bilinear grid, mesh grid, tilted plane)
//! - Linear fade
//! - Temperature sensors (NTC thermistor)
//! - Heater outputs (GPIO)
//! - Thermal guard serviced from safe delays

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod heater;
pub mod leveling;
pub mod sensor;
pub mod thermal;
