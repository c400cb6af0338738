//! Heater outputs

pub mod gpio;

pub use gpio::GpioHeater;
