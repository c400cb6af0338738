//! Machine information report
//!
//! Captures everything the report needs up front, so rendering is a plain
//! `Display` impl with no access to machine state.

use core::fmt::{self, Write};

use heapless::String;

use crate::config::MachineConfig;
use crate::leveling::{
    resolve_correction, ActiveLeveling, Correction, FadeHeight, LevelingStrategy,
};
use crate::motion::{Axis, Xyz};
use crate::probe::{classify_offset, LabelSet, MachineKind, OffsetPlacement, ProbeKind};
use crate::traits::FadeScaling;

/// Probe part of the report
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeStatus {
    pub kind: ProbeKind,
    pub offset: Xyz,
    pub placement: OffsetPlacement,
}

/// Leveling part of the report
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LevelingStatus {
    pub strategy: LevelingStrategy,
    pub enabled: bool,
    pub fade_height: FadeHeight,
    /// Correction at the current position; `None` while disabled
    pub correction: Option<Correction>,
}

/// Machine information snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineReport {
    pub machine: MachineKind,
    pub probe: ProbeStatus,
    pub leveling: LevelingStatus,
}

impl MachineReport {
    /// Capture the report for the tool at `position`
    ///
    /// The strategy comes from `active`; enable state and fade height come
    /// from the configuration.
    pub fn capture<F>(
        config: &MachineConfig,
        active: &ActiveLeveling<'_>,
        position: Xyz,
        fade: &F,
    ) -> Self
    where
        F: FadeScaling + ?Sized,
    {
        let strategy = active.strategy();
        let enabled = config.leveling.enabled && strategy != LevelingStrategy::None;
        let fade_height = config.leveling.fade_height;

        let correction = if enabled {
            Some(resolve_correction(active, position, fade_height, fade))
        } else {
            None
        };

        Self {
            machine: config.machine,
            probe: ProbeStatus {
                kind: config.probe.kind,
                offset: config.probe.offset,
                placement: classify_offset(config.probe.offset),
            },
            leveling: LevelingStatus {
                strategy,
                enabled,
                fade_height,
                correction,
            },
        }
    }

    /// Render into a fixed-capacity string
    pub fn render<const N: usize>(&self) -> Result<String<N>, fmt::Error> {
        let mut out = String::new();
        write!(out, "{}", self)?;
        Ok(out)
    }

    fn fmt_probe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let probe = &self.probe;
        writeln!(f, "Probe: {}", probe.kind.label())?;

        if !probe.kind.is_mounted() {
            return Ok(());
        }

        let [horizontal, lateral, vertical] = probe.placement.labels(self.label_set());
        writeln!(
            f,
            "Probe Offset X{:.3} Y{:.3} Z{:.3} ({}, {}, {})",
            probe.offset.x, probe.offset.y, probe.offset.z, horizontal, lateral, vertical
        )
    }

    fn fmt_leveling(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leveling = &self.leveling;
        let title = match leveling.strategy {
            LevelingStrategy::None => return writeln!(f, "Bed Leveling: NONE"),
            LevelingStrategy::SimpleMesh => "Mesh Bed Leveling",
            _ => "Auto Bed Leveling",
        };

        let state = if leveling.enabled { "enabled" } else { "disabled" };
        writeln!(f, "{}: {} ({})", title, leveling.strategy.label(), state)?;

        let Some(correction) = leveling.correction else {
            return Ok(());
        };

        if leveling.fade_height.is_enabled() {
            writeln!(f, "Z Fade: {:.3}", leveling.fade_height.mm())?;
        }

        let prefix = match leveling.strategy {
            LevelingStrategy::UnifiedMesh => "UBL",
            LevelingStrategy::SimpleMesh => "MBL",
            _ => "ABL",
        };

        match correction {
            Correction::Scalar(result) => {
                write!(f, "{} Adjustment Z{:+.3}", prefix, result.raw)?;
                if leveling.fade_height.is_enabled() {
                    write!(f, " ({:+.3})", result.attenuated)?;
                }
                writeln!(f)
            }
            Correction::Planar(planar) => {
                write!(f, "{} Adjustment", prefix)?;
                for axis in Axis::ALL {
                    write!(f, " {}{:+.3}", axis.letter(), planar.delta.axis(axis))?;
                }
                writeln!(f)
            }
        }
    }

    fn label_set(&self) -> LabelSet {
        self.machine.label_set()
    }
}

impl fmt::Display for MachineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Machine Type: {}", self.machine.label())?;
        self.fmt_probe(f)?;
        self.fmt_leveling(f)
    }
}
