//! Machine diagnostics
//!
//! Snapshot of the leveling and probe state, rendered as human-readable
//! text for whatever transport the firmware uses.

pub mod report;

pub use report::{LevelingStatus, MachineReport, ProbeStatus};
