//! Machine coordinates
//!
//! Positions are produced by the motion subsystem and are read-only here.

pub mod position;

pub use position::{Axis, Xyz};
