//! Leveling report task
//!
//! Logs the machine report at a few heights through the fade band so the
//! configured compensation can be checked from the debug probe.

use defmt::*;
use embassy_time::Timer;

use nivel_core::config::MachineConfig;
use nivel_core::diagnostics::MachineReport;
use nivel_core::motion::Xyz;
use nivel_drivers::leveling::{LevelingTables, LinearFade};

const REPORT_CAPACITY: usize = 512;

#[embassy_executor::task]
pub async fn report_task(config: &'static MachineConfig, tables: &'static LevelingTables) {
    let fade = config.leveling.fade_height;
    let (x, y) = (config.leveling.fulcrum_x, config.leveling.fulcrum_y);
    let heights = [0.0, fade.mm() / 2.0, fade.mm()];

    for z in heights {
        let position = Xyz::new(x, y, z);
        let report = MachineReport::capture(config, &tables.active(), position, &LinearFade);

        info!("Machine report at X{} Y{} Z{}:", x, y, z);
        match report.render::<REPORT_CAPACITY>() {
            Ok(text) => {
                for line in text.lines() {
                    info!("  {=str}", line);
                }
            }
            Err(_) => warn!("Machine report did not fit in {} bytes", REPORT_CAPACITY),
        }

        if !fade.is_enabled() {
            break;
        }
        Timer::after_millis(100).await;
    }
}
