//! Machine and probe kinds

use super::offset::LabelSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Machine kinematics family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MachineKind {
    #[default]
    Cartesian,
    /// CoreXY / CoreXZ / CoreYZ
    Core,
    Delta,
    Scara,
}

impl MachineKind {
    /// Display name
    pub const fn label(&self) -> &'static str {
        match self {
            MachineKind::Cartesian => "Cartesian",
            MachineKind::Core => "Core",
            MachineKind::Delta => "Delta",
            MachineKind::Scara => "SCARA",
        }
    }

    /// Offset label set matching this machine's end-effector orientation
    pub const fn label_set(&self) -> LabelSet {
        match self {
            MachineKind::Scara => LabelSet::Scara,
            _ => LabelSet::Cartesian,
        }
    }

    /// Parse a configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "cartesian" | "Cartesian" => Some(MachineKind::Cartesian),
            "core" | "corexy" | "Core" => Some(MachineKind::Core),
            "delta" | "Delta" => Some(MachineKind::Delta),
            "scara" | "SCARA" => Some(MachineKind::Scara),
            _ => None,
        }
    }
}

/// Bed probe type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ProbeKind {
    /// No probe fitted
    #[default]
    None,
    /// Paper test / manual probing
    Manual,
    FixMounted,
    BlTouch,
    /// Generic servo-deployed probe
    Servo,
    TouchMi,
    Sled,
    AllenKey,
    Solenoid,
}

impl ProbeKind {
    /// Display name
    pub const fn label(&self) -> &'static str {
        match self {
            ProbeKind::None => "NONE",
            ProbeKind::Manual => "PROBE_MANUALLY",
            ProbeKind::FixMounted => "FIX_MOUNTED_PROBE",
            ProbeKind::BlTouch => "BLTOUCH",
            ProbeKind::Servo => "SERVO PROBE",
            ProbeKind::TouchMi => "TOUCH_MI_PROBE",
            ProbeKind::Sled => "Z_PROBE_SLED",
            ProbeKind::AllenKey => "Z_PROBE_ALLEN_KEY",
            ProbeKind::Solenoid => "SOLENOID_PROBE",
        }
    }

    /// Check if a physical probe is mounted on the toolhead
    ///
    /// Only mounted probes have a meaningful offset to report.
    pub const fn is_mounted(&self) -> bool {
        !matches!(self, ProbeKind::None | ProbeKind::Manual)
    }

    /// Parse a configuration name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "none" => Some(ProbeKind::None),
            "manual" => Some(ProbeKind::Manual),
            "fix_mounted" | "fixed" => Some(ProbeKind::FixMounted),
            "bltouch" => Some(ProbeKind::BlTouch),
            "servo" => Some(ProbeKind::Servo),
            "touch_mi" => Some(ProbeKind::TouchMi),
            "sled" => Some(ProbeKind::Sled),
            "allen_key" => Some(ProbeKind::AllenKey),
            "solenoid" => Some(ProbeKind::Solenoid),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scara_uses_scara_labels() {
        assert_eq!(MachineKind::Scara.label_set(), LabelSet::Scara);
        assert_eq!(MachineKind::Delta.label_set(), LabelSet::Cartesian);
        assert_eq!(MachineKind::Cartesian.label_set(), LabelSet::Cartesian);
    }

    #[test]
    fn test_mounted_probes() {
        assert!(!ProbeKind::None.is_mounted());
        assert!(!ProbeKind::Manual.is_mounted());
        assert!(ProbeKind::BlTouch.is_mounted());
        assert!(ProbeKind::Solenoid.is_mounted());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(MachineKind::from_name("corexy"), Some(MachineKind::Core));
        assert_eq!(MachineKind::from_name("polar"), None);
        assert_eq!(ProbeKind::from_name("bltouch"), Some(ProbeKind::BlTouch));
        assert_eq!(ProbeKind::from_name("laser"), None);
    }
}
