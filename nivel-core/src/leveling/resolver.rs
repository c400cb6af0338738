//! Leveling compensation resolver
//!
//! Given the active strategy (with its table), a tool position and the fade
//! height, decide how the position must be corrected. Scalar strategies
//! yield a Z offset with optional fade attenuation; planar strategies yield
//! a per-axis delta and are never faded.
//!
//! The resolver is pure: every input arrives as an argument.

use core::fmt;

use super::fade::FadeHeight;
use super::strategy::LevelingStrategy;
use crate::motion::Xyz;
use crate::traits::{FadeScaling, HeightMap, PlanarLeveling};

/// Scalar Z correction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CorrectionResult {
    /// Correction from the table, before fading
    pub raw: f32,
    /// Correction after fading (equal to `raw` when fade is off)
    pub attenuated: f32,
    /// Fade factor actually applied, in [0, 1]
    pub factor: f32,
}

impl CorrectionResult {
    /// No correction
    pub const ZERO: CorrectionResult = CorrectionResult::unattenuated(0.0);

    /// Correction with fading off
    pub const fn unattenuated(raw: f32) -> Self {
        Self {
            raw,
            attenuated: raw,
            factor: 1.0,
        }
    }
}

/// Per-axis correction from a planar strategy
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlanarCorrection {
    /// Leveled position minus nominal position
    pub delta: Xyz,
}

/// Resolved correction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Correction {
    /// Single Z offset (None, Bilinear, UnifiedMesh, SimpleMesh)
    Scalar(CorrectionResult),
    /// Per-axis delta (Linear, ThreePoint)
    Planar(PlanarCorrection),
}

impl Correction {
    /// Scalar result, if this correction is scalar
    pub fn scalar(&self) -> Option<CorrectionResult> {
        match self {
            Correction::Scalar(result) => Some(*result),
            Correction::Planar(_) => None,
        }
    }

    /// Planar result, if this correction is planar
    pub fn planar(&self) -> Option<PlanarCorrection> {
        match self {
            Correction::Planar(result) => Some(*result),
            Correction::Scalar(_) => None,
        }
    }
}

/// Active strategy bundled with the table it reads from
///
/// Holding the table in the variant makes "mesh strategy active, no mesh
/// loaded" unrepresentable.
#[derive(Clone, Copy)]
pub enum ActiveLeveling<'a> {
    None,
    Linear(&'a dyn PlanarLeveling),
    Bilinear(&'a dyn HeightMap),
    ThreePoint(&'a dyn PlanarLeveling),
    UnifiedMesh(&'a dyn HeightMap),
    SimpleMesh(&'a dyn HeightMap),
}

impl ActiveLeveling<'_> {
    /// Strategy tag of this variant
    pub fn strategy(&self) -> LevelingStrategy {
        match self {
            ActiveLeveling::None => LevelingStrategy::None,
            ActiveLeveling::Linear(_) => LevelingStrategy::Linear,
            ActiveLeveling::Bilinear(_) => LevelingStrategy::Bilinear,
            ActiveLeveling::ThreePoint(_) => LevelingStrategy::ThreePoint,
            ActiveLeveling::UnifiedMesh(_) => LevelingStrategy::UnifiedMesh,
            ActiveLeveling::SimpleMesh(_) => LevelingStrategy::SimpleMesh,
        }
    }
}

impl fmt::Debug for ActiveLeveling<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveLeveling")
            .field(&self.strategy())
            .finish()
    }
}

/// Resolve the correction for `position` under the active strategy
pub fn resolve_correction<F>(
    active: &ActiveLeveling<'_>,
    position: Xyz,
    fade_height: FadeHeight,
    fade: &F,
) -> Correction
where
    F: FadeScaling + ?Sized,
{
    match active {
        ActiveLeveling::None => Correction::Scalar(CorrectionResult::ZERO),
        ActiveLeveling::Linear(plane) | ActiveLeveling::ThreePoint(plane) => {
            Correction::Planar(PlanarCorrection {
                delta: plane.apply(position) - position,
            })
        }
        ActiveLeveling::Bilinear(map)
        | ActiveLeveling::UnifiedMesh(map)
        | ActiveLeveling::SimpleMesh(map) => {
            let raw = map.z_correction(position.x, position.y);
            Correction::Scalar(attenuate(raw, position.z, fade_height, fade))
        }
    }
}

/// Compose a raw Z correction with fade attenuation at height `z`
///
/// With fading off the correction passes through untouched. Otherwise the
/// fade function supplies the factor, which is forced into [0, 1] and to
/// exactly 0 at or above the fade height.
pub fn attenuate<F>(raw: f32, z: f32, fade_height: FadeHeight, fade: &F) -> CorrectionResult
where
    F: FadeScaling + ?Sized,
{
    if !fade_height.is_enabled() {
        return CorrectionResult::unattenuated(raw);
    }

    let factor = if z >= fade_height.mm() {
        0.0
    } else {
        let factor = fade.scale(z, fade_height);
        if factor.is_nan() {
            0.0
        } else {
            factor.clamp(0.0, 1.0)
        }
    };

    CorrectionResult {
        raw,
        attenuated: raw * factor,
        factor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Height map returning the same offset everywhere
    struct Flat(f32);

    impl HeightMap for Flat {
        fn z_correction(&self, _x: f32, _y: f32) -> f32 {
            self.0
        }
    }

    /// Height map that slopes along X
    struct SlopeX(f32);

    impl HeightMap for SlopeX {
        fn z_correction(&self, x: f32, _y: f32) -> f32 {
            x * self.0
        }
    }

    /// Plane that lifts Z by a constant and shifts X
    struct Shift(Xyz);

    impl PlanarLeveling for Shift {
        fn apply(&self, position: Xyz) -> Xyz {
            position + self.0
        }
    }

    /// Linear fade ramp
    struct Ramp;

    impl FadeScaling for Ramp {
        fn scale(&self, z: f32, fade_height: FadeHeight) -> f32 {
            1.0 - z / fade_height.mm()
        }
    }

    /// Misbehaving fade that ignores its inputs
    struct Constant(f32);

    impl FadeScaling for Constant {
        fn scale(&self, _z: f32, _fade_height: FadeHeight) -> f32 {
            self.0
        }
    }

    fn fade(mm: f32) -> FadeHeight {
        FadeHeight::new(mm).unwrap()
    }

    fn scalar_variants(map: &dyn HeightMap) -> [ActiveLeveling<'_>; 3] {
        [
            ActiveLeveling::Bilinear(map),
            ActiveLeveling::UnifiedMesh(map),
            ActiveLeveling::SimpleMesh(map),
        ]
    }

    #[test]
    fn test_bilinear_without_fade() {
        let map = Flat(0.3);
        let active = ActiveLeveling::Bilinear(&map);
        let result = resolve_correction(
            &active,
            Xyz::new(10.0, 10.0, 0.0),
            FadeHeight::DISABLED,
            &Ramp,
        );
        assert_eq!(
            result,
            Correction::Scalar(CorrectionResult {
                raw: 0.3,
                attenuated: 0.3,
                factor: 1.0
            })
        );
    }

    #[test]
    fn test_bilinear_half_faded() {
        let map = Flat(0.3);
        let active = ActiveLeveling::Bilinear(&map);
        let result = resolve_correction(&active, Xyz::new(10.0, 10.0, 2.0), fade(4.0), &Ramp)
            .scalar()
            .unwrap();
        assert_eq!(result.raw, 0.3);
        assert_eq!(result.factor, 0.5);
        assert!((result.attenuated - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_none_ignores_everything() {
        let result = resolve_correction(
            &ActiveLeveling::None,
            Xyz::new(100.0, 50.0, 1.0),
            fade(10.0),
            &Constant(0.25),
        );
        assert_eq!(result, Correction::Scalar(CorrectionResult::ZERO));
        assert_eq!(CorrectionResult::ZERO.factor, 1.0);
    }

    #[test]
    fn test_planar_reports_delta_and_is_never_faded() {
        let plane = Shift(Xyz::new(-0.01, 0.0, 0.2));
        for active in [ActiveLeveling::Linear(&plane), ActiveLeveling::ThreePoint(&plane)] {
            // Above the fade height a scalar correction would be zero
            let result = resolve_correction(&active, Xyz::new(50.0, 50.0, 20.0), fade(5.0), &Ramp);
            let delta = result.planar().unwrap().delta;
            assert!((delta.x + 0.01).abs() < 1e-4);
            assert_eq!(delta.y, 0.0);
            assert!((delta.z - 0.2).abs() < 1e-4);
            assert!(result.scalar().is_none());
        }
    }

    #[test]
    fn test_scalar_strategies_query_xy() {
        let map = SlopeX(0.01);
        for active in scalar_variants(&map) {
            let result = resolve_correction(
                &active,
                Xyz::new(20.0, 99.0, 0.0),
                FadeHeight::DISABLED,
                &Ramp,
            );
            assert!((result.scalar().unwrap().raw - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn test_strategy_tags() {
        let map = Flat(0.0);
        let plane = Shift(Xyz::ZERO);
        assert_eq!(ActiveLeveling::None.strategy(), LevelingStrategy::None);
        assert_eq!(
            ActiveLeveling::Linear(&plane).strategy(),
            LevelingStrategy::Linear
        );
        assert_eq!(
            ActiveLeveling::ThreePoint(&plane).strategy(),
            LevelingStrategy::ThreePoint
        );
        let tags = scalar_variants(&map).map(|a| a.strategy());
        assert_eq!(
            tags,
            [
                LevelingStrategy::Bilinear,
                LevelingStrategy::UnifiedMesh,
                LevelingStrategy::SimpleMesh
            ]
        );
    }

    #[test]
    fn test_factor_is_clamped() {
        let high = attenuate(1.0, 1.0, fade(10.0), &Constant(3.0));
        assert_eq!(high.factor, 1.0);

        let low = attenuate(1.0, 1.0, fade(10.0), &Constant(-2.0));
        assert_eq!(low.factor, 0.0);
        assert_eq!(low.attenuated, 0.0);

        let nan = attenuate(1.0, 1.0, fade(10.0), &Constant(f32::NAN));
        assert_eq!(nan.factor, 0.0);
    }

    #[test]
    fn test_at_fade_height_is_zero_even_for_sloppy_fade() {
        let result = attenuate(0.4, 10.0, fade(10.0), &Constant(0.9));
        assert_eq!(result.factor, 0.0);
        assert_eq!(result.attenuated, 0.0);
        assert_eq!(result.raw, 0.4);
    }

    proptest! {
        #[test]
        fn prop_none_is_zero(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            z in -5.0f32..500.0,
            fh in 0.0f32..50.0,
        ) {
            let result = resolve_correction(&ActiveLeveling::None, Xyz::new(x, y, z), fade(fh), &Ramp);
            prop_assert_eq!(result, Correction::Scalar(CorrectionResult { raw: 0.0, attenuated: 0.0, factor: 1.0 }));
        }

        #[test]
        fn prop_no_fade_passes_raw_through(
            offset in -2.0f32..2.0,
            z in -5.0f32..500.0,
        ) {
            let map = Flat(offset);
            for active in scalar_variants(&map) {
                let result = resolve_correction(&active, Xyz::new(1.0, 2.0, z), FadeHeight::DISABLED, &Ramp)
                    .scalar()
                    .unwrap();
                prop_assert_eq!(result.attenuated, result.raw);
                prop_assert_eq!(result.factor, 1.0);
            }
        }

        #[test]
        fn prop_above_fade_is_zero(
            offset in -2.0f32..2.0,
            fh in 0.1f32..50.0,
            above in 0.0f32..100.0,
        ) {
            let map = Flat(offset);
            for active in scalar_variants(&map) {
                let result = resolve_correction(&active, Xyz::new(0.0, 0.0, fh + above), fade(fh), &Ramp)
                    .scalar()
                    .unwrap();
                prop_assert_eq!(result.attenuated, 0.0);
            }
        }

        #[test]
        fn prop_factor_in_unit_interval(
            z in -50.0f32..100.0,
            fh in 0.0f32..50.0,
            wild in -10.0f32..10.0,
        ) {
            let result = attenuate(1.0, z, fade(fh), &Constant(wild));
            prop_assert!((0.0..=1.0).contains(&result.factor));
        }

        #[test]
        fn prop_attenuation_monotonic(
            offset in -2.0f32..2.0,
            fh in 0.1f32..50.0,
            a in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let low = attenuate(offset, lo * fh, fade(fh), &Ramp);
            let high = attenuate(offset, hi * fh, fade(fh), &Ramp);
            prop_assert!(high.attenuated.abs() <= low.attenuated.abs());
        }
    }
}
