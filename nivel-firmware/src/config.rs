//! Configuration loading
//!
//! The machine configuration is compiled into the firmware from
//! machine.toml, which build.rs has already validated.

use defmt::*;

use nivel_core::config::{load_config, MachineConfig};

/// Embedded configuration (compiled into firmware)
/// Edit machine.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../machine.toml");

/// Parse the embedded configuration, falling back to leveling off
pub fn load() -> MachineConfig {
    match load_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Config: {} machine, {} probe, {} leveling",
                config.machine.label(),
                config.probe.kind.label(),
                config.leveling.strategy.label()
            );
            config
        }
        Err(e) => {
            // Only reachable if build-time validation and the parser disagree
            error!("Failed to load embedded config: {}", e);
            error!("Using fallback configuration with leveling off");
            MachineConfig::default()
        }
    }
}
