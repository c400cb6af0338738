//! Embassy async tasks

pub mod report;
pub mod thermal;

pub use report::report_task;
pub use thermal::thermal_task;
