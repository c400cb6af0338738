//! Probe description and offset classification

pub mod kind;
pub mod offset;

pub use kind::{MachineKind, ProbeKind};
pub use offset::{
    classify_offset, HorizontalPlacement, LabelSet, LateralPlacement, OffsetPlacement,
    VerticalPlacement,
};
