//! Nivel - Bed Leveling & Thermal Safety Firmware
//!
//! Main firmware binary for RP2040-based printer controllers. Loads the
//! embedded machine configuration, builds the leveling table for the
//! configured strategy, and keeps the hotend thermal guard serviced.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig};
use embassy_rp::gpio::{Level, Output, Pull};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use nivel_core::config::MachineConfig;
use nivel_drivers::heater::GpioHeater;
use nivel_drivers::leveling::LevelingTables;
use nivel_drivers::sensor::Ntc100kSensor;
use nivel_drivers::thermal::ThermalGuard;

use crate::board::RpAdc;

mod board;
mod config;
mod tasks;

// Tasks borrow configuration and tables for the program duration
static MACHINE_CONFIG: StaticCell<MachineConfig> = StaticCell::new();
static LEVELING: StaticCell<LevelingTables> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Nivel firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static MachineConfig = MACHINE_CONFIG.init(config::load());

    let tables = match LevelingTables::build(config) {
        Ok(tables) => tables,
        Err(e) => {
            warn!("Leveling table unavailable ({}), compensation off", e);
            LevelingTables::None
        }
    };
    let tables: &'static LevelingTables = LEVELING.init(tables);
    info!("Leveling strategy: {}", tables.strategy().label());

    // Hotend thermistor on TH0, heater MOSFET on HE0
    let adc = Adc::new_blocking(p.ADC, AdcConfig::default());
    let channel = Channel::new_pin(p.PIN_27, Pull::None);
    let sensor = Ntc100kSensor::from_config(RpAdc::new(adc, channel), &config.thermal);
    let heater = GpioHeater::new_active_high(Output::new(p.PIN_23, Level::Low));
    let guard = ThermalGuard::from_config(sensor, heater, &config.thermal);

    info!("ADC and heater initialized");

    spawner.spawn(tasks::thermal_task(guard)).unwrap();
    spawner.spawn(tasks::report_task(config, tables)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
