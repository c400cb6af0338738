//! Thermal guard
//!
//! The concrete safety routine serviced by every safe delay: sample the
//! sensor, feed the watch, and force the heater off while a fault is
//! latched.

use nivel_core::config::ThermalConfig;
use nivel_core::safety::{SafetyRoutine, ThermalStatus, ThermalWatch};
use nivel_core::traits::{HeaterOutput, TemperatureSensor};

/// Sensor, heater and fault watch serviced as one routine
pub struct ThermalGuard<S, H> {
    sensor: S,
    heater: H,
    watch: ThermalWatch,
}

impl<S: TemperatureSensor, H: HeaterOutput> ThermalGuard<S, H> {
    /// Create a guard; the heater is switched off until requested
    pub fn new(sensor: S, mut heater: H, max_temp_c: i16) -> Self {
        heater.set_on(false);
        Self {
            sensor,
            heater,
            watch: ThermalWatch::new(max_temp_c),
        }
    }

    pub fn from_config(sensor: S, heater: H, config: &ThermalConfig) -> Self {
        Self::new(sensor, heater, config.max_temp_c)
    }

    /// Switch the heater, refusing to turn it on while a fault is latched
    ///
    /// Returns the resulting heater state.
    pub fn request_heat(&mut self, on: bool) -> bool {
        let allowed = self.watch.check().heating_allowed();
        self.heater.set_on(on && allowed);
        self.heater.is_on()
    }

    /// Clear a latched fault once readings are healthy again
    pub fn reset(&mut self) -> bool {
        self.watch.reset()
    }

    pub fn status(&self) -> ThermalStatus {
        self.watch.check()
    }

    /// Last good temperature in °C
    pub fn temperature(&self) -> Option<i16> {
        self.watch.temperature()
    }

    pub fn watch(&self) -> &ThermalWatch {
        &self.watch
    }

    pub fn heater(&self) -> &H {
        &self.heater
    }
}

impl<S: TemperatureSensor, H: HeaterOutput> SafetyRoutine for ThermalGuard<S, H> {
    fn service(&mut self) {
        let was_ok = self.watch.check().heating_allowed();
        let status = self.watch.update(self.sensor.read_celsius_x10());

        if let ThermalStatus::Fault(_fault) = status {
            self.heater.set_on(false);
            if was_ok {
                #[cfg(feature = "defmt")]
                defmt::error!("Thermal fault: {}, heater off", _fault);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_hal::delay::DelayNs;
    use nivel_core::safety::{safe_delay, ThermalFault};
    use nivel_core::traits::SensorError;

    /// Sensor that heats up by a fixed step on every read
    struct Ramp {
        temp_x10: i16,
        step_x10: i16,
    }

    impl TemperatureSensor for Ramp {
        fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
            self.temp_x10 += self.step_x10;
            Ok(self.temp_x10)
        }
    }

    struct Unplugged;

    impl TemperatureSensor for Unplugged {
        fn read_celsius_x10(&mut self) -> Result<i16, SensorError> {
            Err(SensorError::OpenCircuit)
        }
    }

    #[derive(Default)]
    struct Heater {
        on: bool,
    }

    impl HeaterOutput for Heater {
        fn set_on(&mut self, on: bool) {
            self.on = on;
        }

        fn is_on(&self) -> bool {
            self.on
        }
    }

    struct CountingDelay<'a>(&'a Cell<u32>);

    impl DelayNs for CountingDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.0.set(self.0.get() + ns / 1_000_000);
        }

        fn delay_ms(&mut self, ms: u32) {
            self.0.set(self.0.get() + ms);
        }
    }

    #[test]
    fn test_heater_allowed_while_healthy() {
        let sensor = Ramp {
            temp_x10: 200,
            step_x10: 0,
        };
        let mut guard = ThermalGuard::new(sensor, Heater::default(), 275);

        assert!(guard.request_heat(true));
        guard.service();
        assert_eq!(guard.status(), ThermalStatus::Ok);
        assert!(guard.heater().is_on());
        assert_eq!(guard.temperature(), Some(20));
    }

    #[test]
    fn test_sensor_fault_cuts_heater() {
        let mut guard = ThermalGuard::new(Unplugged, Heater::default(), 275);
        guard.request_heat(true);

        guard.service();
        assert_eq!(guard.status(), ThermalStatus::Fault(ThermalFault::SensorFault));
        assert!(!guard.heater().is_on());

        // Latched: requests are refused and reset needs a good reading
        assert!(!guard.request_heat(true));
        assert!(!guard.reset());
    }

    #[test]
    fn test_runaway_caught_during_long_delay() {
        // +10 °C per sample from 200 °C trips a 275 °C limit on sample 8
        let sensor = Ramp {
            temp_x10: 2000,
            step_x10: 100,
        };
        let mut guard = ThermalGuard::new(sensor, Heater::default(), 275);
        guard.request_heat(true);

        let elapsed = Cell::new(0);
        safe_delay(&mut CountingDelay(&elapsed), 1000, &mut guard);

        assert_eq!(elapsed.get(), 1000);
        assert_eq!(
            guard.status(),
            ThermalStatus::Fault(ThermalFault::OverTemperature)
        );
        assert!(!guard.heater().is_on());
        assert_eq!(guard.watch().samples(), 20);
    }

    #[test]
    fn test_reset_after_cooling() {
        let sensor = Ramp {
            temp_x10: 2800,
            step_x10: 0,
        };
        let config = ThermalConfig::default();
        let mut guard = ThermalGuard::from_config(sensor, Heater::default(), &config);

        guard.service();
        assert!(!guard.status().heating_allowed());
        assert!(!guard.reset());

        guard.sensor.temp_x10 = 2000;
        guard.service();
        assert!(guard.reset());
        assert!(guard.request_heat(true));
    }
}
