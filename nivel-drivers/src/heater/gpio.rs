//! GPIO heater output
//!
//! Drives a heater MOSFET or SSR from any `embedded-hal` output pin.

use embedded_hal::digital::OutputPin;

use nivel_core::traits::HeaterOutput;

/// Heater switched by a digital output
///
/// A pin error leaves the heater reported as off and is remembered until
/// the next successful switch, so the thermal guard never believes a
/// heater is off when it could not be driven.
pub struct GpioHeater<P> {
    pin: P,
    /// Heater ON drives the pin low
    inverted: bool,
    on: bool,
    pin_fault: bool,
}

impl<P: OutputPin> GpioHeater<P> {
    /// Create a heater output; the heater starts off
    pub fn new(pin: P, inverted: bool) -> Self {
        let mut heater = Self {
            pin,
            inverted,
            on: false,
            pin_fault: false,
        };
        heater.set_on(false);
        heater
    }

    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Last switch attempt failed at the pin
    pub fn pin_fault(&self) -> bool {
        self.pin_fault
    }
}

impl<P: OutputPin> HeaterOutput for GpioHeater<P> {
    fn set_on(&mut self, on: bool) {
        let result = if on != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };

        self.pin_fault = result.is_err();
        self.on = on && !self.pin_fault;
    }

    fn is_on(&self) -> bool {
        self.on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embedded_hal::digital::{ErrorKind, ErrorType};

    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    struct BrokenPin;

    impl ErrorType for BrokenPin {
        type Error = ErrorKind;
    }

    impl OutputPin for BrokenPin {
        fn set_low(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }

        fn set_high(&mut self) -> Result<(), ErrorKind> {
            Err(ErrorKind::Other)
        }
    }

    #[test]
    fn test_active_high_heater() {
        let mut heater = GpioHeater::new_active_high(MockPin { high: true });
        assert!(!heater.is_on());
        assert!(!heater.pin.high);

        heater.set_on(true);
        assert!(heater.is_on());
        assert!(heater.pin.high);

        heater.set_on(false);
        assert!(!heater.pin.high);
    }

    #[test]
    fn test_active_low_heater() {
        let mut heater = GpioHeater::new_active_low(MockPin { high: false });
        assert!(!heater.is_on());
        assert!(heater.pin.high);

        heater.set_on(true);
        assert!(heater.is_on());
        assert!(!heater.pin.high);
    }

    #[test]
    fn test_pin_error_reports_off() {
        let mut heater = GpioHeater::new_active_high(BrokenPin);
        assert!(heater.pin_fault());

        heater.set_on(true);
        assert!(!heater.is_on());
        assert!(heater.pin_fault());
    }
}
