//! Board-agnostic core logic for the Nivel printer firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware and collaborator traits (heater, sensor, height map, fade)
//! - Bounded safe delay that keeps thermal protection serviced
//! - Leveling compensation resolver
//! - Probe offset classification
//! - Machine diagnostics report
//! - Configuration types and parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostics;
pub mod leveling;
pub mod motion;
pub mod probe;
pub mod safety;
pub mod traits;
