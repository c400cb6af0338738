//! Thermal protection

pub mod guard;

pub use guard::ThermalGuard;
