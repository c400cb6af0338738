//! RP2040 board glue
//!
//! Adapts embassy-rp peripherals to the driver traits. Pin assignments
//! follow the BTT SKR Pico (TH0 = GPIO27, HE0 = GPIO23).

use embassy_rp::adc::{Adc, Blocking, Channel};

use nivel_drivers::sensor::{AdcError, AdcReader};

/// Blocking ADC channel
///
/// Blocking reads keep the thermal guard usable from inside a safe delay,
/// which services it synchronously.
pub struct RpAdc<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> RpAdc<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for RpAdc<'_> {
    fn read(&mut self) -> Result<u16, AdcError> {
        self.adc
            .blocking_read(&mut self.channel)
            .map_err(|_| AdcError)
    }
}
