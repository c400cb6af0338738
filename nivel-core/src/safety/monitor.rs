//! Thermal watch
//!
//! Pure fault-detection logic behind the periodic safety routine. Faults
//! latch: once tripped, the heater stays off until an explicit reset with a
//! healthy reading.

use crate::traits::SensorError;

/// Default maximum hotend temperature (°C)
pub const DEFAULT_MAX_TEMP_C: i16 = 275;

/// Thermal fault kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermalFault {
    /// Sensor read failed (open, short, out of range)
    SensorFault,
    /// Reading above the configured maximum
    OverTemperature,
}

/// Thermal condition status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ThermalStatus {
    /// All conditions normal
    Ok,
    /// Fault latched; the heater must be off
    Fault(ThermalFault),
}

impl ThermalStatus {
    /// Check if heating is allowed
    pub fn heating_allowed(&self) -> bool {
        matches!(self, ThermalStatus::Ok)
    }
}

/// Thermal fault detector
#[derive(Debug, Clone)]
pub struct ThermalWatch {
    /// Maximum allowed temperature (×10 for 0.1°C resolution)
    max_temp_x10: i16,
    /// Last good reading (×10)
    last_temp_x10: Option<i16>,
    /// Latched fault, if any
    latched: Option<ThermalFault>,
    /// Number of readings processed
    samples: u32,
}

impl Default for ThermalWatch {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TEMP_C)
    }
}

impl ThermalWatch {
    /// Create a watch with the given maximum temperature in °C
    pub fn new(max_temp_c: i16) -> Self {
        Self {
            max_temp_x10: max_temp_c.saturating_mul(10),
            last_temp_x10: None,
            latched: None,
            samples: 0,
        }
    }

    /// Feed one sensor reading (0.1°C units) and return the resulting status
    pub fn update(&mut self, reading: Result<i16, SensorError>) -> ThermalStatus {
        self.samples = self.samples.wrapping_add(1);

        match reading {
            Ok(temp_x10) => {
                self.last_temp_x10 = Some(temp_x10);
                if temp_x10 > self.max_temp_x10 {
                    self.trip(ThermalFault::OverTemperature);
                }
            }
            Err(_) => {
                self.last_temp_x10 = None;
                self.trip(ThermalFault::SensorFault);
            }
        }

        self.check()
    }

    /// Current status
    pub fn check(&self) -> ThermalStatus {
        match self.latched {
            Some(fault) => ThermalStatus::Fault(fault),
            None => ThermalStatus::Ok,
        }
    }

    /// Clear a latched fault
    ///
    /// Only succeeds when the last reading is valid and within limits.
    /// Returns true if the watch is now clear.
    pub fn reset(&mut self) -> bool {
        match self.last_temp_x10 {
            Some(temp_x10) if temp_x10 <= self.max_temp_x10 => {
                self.latched = None;
                true
            }
            _ => false,
        }
    }

    /// Last good temperature in whole degrees Celsius
    pub fn temperature(&self) -> Option<i16> {
        self.last_temp_x10.map(|t| t / 10)
    }

    /// Maximum allowed temperature in whole degrees Celsius
    pub fn max_temperature(&self) -> i16 {
        self.max_temp_x10 / 10
    }

    /// Number of readings processed since creation
    pub fn samples(&self) -> u32 {
        self.samples
    }

    fn trip(&mut self, fault: ThermalFault) {
        // The first fault wins; later ones do not overwrite the cause
        if self.latched.is_none() {
            self.latched = Some(fault);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_operation() {
        let mut watch = ThermalWatch::new(250);
        assert_eq!(watch.update(Ok(2100)), ThermalStatus::Ok);
        assert_eq!(watch.temperature(), Some(210));
        assert!(watch.check().heating_allowed());
    }

    #[test]
    fn test_over_temperature_latches() {
        let mut watch = ThermalWatch::new(250);
        assert_eq!(
            watch.update(Ok(2510)),
            ThermalStatus::Fault(ThermalFault::OverTemperature)
        );

        // Cooling down does not clear the latch on its own
        assert_eq!(
            watch.update(Ok(2000)),
            ThermalStatus::Fault(ThermalFault::OverTemperature)
        );
        assert!(!watch.check().heating_allowed());

        assert!(watch.reset());
        assert_eq!(watch.check(), ThermalStatus::Ok);
    }

    #[test]
    fn test_sensor_fault() {
        let mut watch = ThermalWatch::default();
        assert_eq!(
            watch.update(Err(SensorError::OpenCircuit)),
            ThermalStatus::Fault(ThermalFault::SensorFault)
        );
        assert_eq!(watch.temperature(), None);

        // No valid reading yet, reset refused
        assert!(!watch.reset());
    }

    #[test]
    fn test_first_fault_wins() {
        let mut watch = ThermalWatch::new(250);
        watch.update(Err(SensorError::ShortCircuit));
        watch.update(Ok(3000));
        assert_eq!(
            watch.check(),
            ThermalStatus::Fault(ThermalFault::SensorFault)
        );
    }

    #[test]
    fn test_reset_refused_while_hot() {
        let mut watch = ThermalWatch::new(250);
        watch.update(Ok(2600));
        assert!(!watch.reset());
        assert_eq!(watch.samples(), 1);
        assert_eq!(watch.max_temperature(), 250);
    }

    #[test]
    fn test_limit_is_inclusive() {
        let mut watch = ThermalWatch::new(250);
        assert_eq!(watch.update(Ok(2500)), ThermalStatus::Ok);
    }
}
