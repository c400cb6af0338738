//! NTC 100K thermistor sensor
//!
//! The stock hotend thermistor. Integer-only conversion through a lookup
//! table, so it runs on FPU-less parts inside the safety routine.

use nivel_core::config::ThermalConfig;
use nivel_core::traits::{SensorError, TemperatureSensor};

/// Resistance to temperature, (ohms, °C × 10)
///
/// Beta equation with R0 = 100 kΩ at 25 °C and B = 3950, sorted by
/// decreasing resistance. Covers 0 °C to 300 °C.
const TEMP_TABLE: &[(u32, i16)] = &[
    (336_206, 0),
    (100_000, 250),
    (35_882, 500),
    (14_917, 750),
    (6_975, 1000),
    (3_588, 1250),
    (1_997, 1500),
    (1_186, 1750),
    (745, 2000),
    (531, 2200),
    (388, 2400),
    (291, 2600),
    (223, 2800),
    (174, 3000),
];

/// ADC sample could not be taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcError;

/// Raw ADC channel
pub trait AdcReader {
    /// Read one 12-bit sample (0-4095)
    fn read(&mut self) -> Result<u16, AdcError>;
}

/// NTC 100K thermistor on a pull-up divider
///
/// Circuit: VCC -- pullup -- ADC pin -- NTC -- GND
pub struct Ntc100kSensor<ADC> {
    adc: ADC,
    pullup_ohms: u32,
    adc_max: u16,
}

impl<ADC> Ntc100kSensor<ADC> {
    /// Readings this close to either rail are treated as wiring faults
    const RAIL_MARGIN: u16 = 10;

    /// Create a sensor on a 12-bit ADC
    pub fn new(adc: ADC, pullup_ohms: u32) -> Self {
        Self {
            adc,
            pullup_ohms,
            adc_max: 4096,
        }
    }

    /// Create a sensor with the pull-up from the `[thermal]` section
    pub fn from_config(adc: ADC, config: &ThermalConfig) -> Self {
        Self::new(adc, config.pullup_ohms)
    }

    /// Thermistor resistance for a raw sample
    pub fn adc_to_resistance(&self, adc_value: u16) -> Result<u32, SensorError> {
        if adc_value >= self.adc_max - Self::RAIL_MARGIN {
            return Err(SensorError::OpenCircuit);
        }
        if adc_value < Self::RAIL_MARGIN {
            return Err(SensorError::ShortCircuit);
        }

        let numerator = self.pullup_ohms as u64 * adc_value as u64;
        let denominator = (self.adc_max - adc_value) as u64;
        Ok((numerator / denominator) as u32)
    }

    /// Temperature in 0.1 °C for a resistance, interpolated between entries
    pub fn resistance_to_temp_x10(resistance: u32) -> Result<i16, SensorError> {
        let (r_coldest, _) = TEMP_TABLE[0];
        let (r_hottest, _) = TEMP_TABLE[TEMP_TABLE.len() - 1];
        if resistance > r_coldest || resistance < r_hottest {
            return Err(SensorError::OutOfRange);
        }

        TEMP_TABLE
            .windows(2)
            .find(|pair| resistance <= pair[0].0 && resistance >= pair[1].0)
            .map(|pair| {
                let (r_high, t_low) = pair[0];
                let (r_low, t_high) = pair[1];
                let span = (t_high - t_low) as i64 * (r_high - resistance) as i64
                    / (r_high - r_low) as i64;
                t_low + span as i16
            })
            .ok_or(SensorError::OutOfRange)
    }
}

impl<ADC: AdcReader> TemperatureSensor for Ntc100kSensor<ADC> {
    fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
        let adc_value = self.adc.read().map_err(|_| SensorError::ConversionError)?;
        let resistance = self.adc_to_resistance(adc_value)?;
        Self::resistance_to_temp_x10(resistance)
    }
}
