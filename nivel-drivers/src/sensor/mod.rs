//! Temperature sensors

pub mod ntc100k;

pub use ntc100k::{AdcError, AdcReader, Ntc100kSensor};
