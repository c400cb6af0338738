//! Safety primitives
//!
//! Keeps the thermal protection routine serviced during long waits and
//! detects thermal fault conditions.

pub mod delay;
pub mod monitor;

pub use delay::{safe_delay, safe_delay_async, SafetyRoutine, SLICE_MS};
pub use monitor::{ThermalFault, ThermalStatus, ThermalWatch};
