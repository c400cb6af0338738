//! Thermal protection task
//!
//! Services the hotend guard through the async safe delay, so the sensor
//! is sampled at least every slice no matter how the period is chosen.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::Delay;

use nivel_core::safety::{safe_delay_async, ThermalStatus};
use nivel_core::traits::HeaterOutput;
use nivel_drivers::heater::GpioHeater;
use nivel_drivers::sensor::Ntc100kSensor;
use nivel_drivers::thermal::ThermalGuard;

use crate::board::RpAdc;

/// Guard for the hotend thermistor and heater
pub type HotendGuard =
    ThermalGuard<Ntc100kSensor<RpAdc<'static>>, GpioHeater<Output<'static>>>;

/// Status report interval (ms)
const REPORT_INTERVAL_MS: u32 = 5_000;

#[embassy_executor::task]
pub async fn thermal_task(mut guard: HotendGuard) {
    info!(
        "Thermal guard running, max {}°C",
        guard.watch().max_temperature()
    );

    let mut delay = Delay;
    let mut reported = ThermalStatus::Ok;

    loop {
        safe_delay_async(&mut delay, REPORT_INTERVAL_MS, &mut guard).await;

        let status = guard.status();
        if status != reported {
            if let ThermalStatus::Fault(fault) = status {
                error!("Hotend heater disabled: {}", fault);
            }
            reported = status;
        }

        match guard.temperature() {
            Some(temp) => debug!("Hotend {}°C, heater {}", temp, guard.heater().is_on()),
            None => warn!("Hotend temperature unavailable"),
        }
    }
}
