//! Cartesian position types
//!
//! Coordinates are in millimetres of machine space. The same triple is used
//! for tool positions, probe offsets, and per-axis correction deltas.

use core::ops::{Add, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in report order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Single-letter axis name
    pub const fn letter(&self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

/// Ordered (x, y, z) triple in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Xyz {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Xyz {
    /// Origin
    pub const ZERO: Xyz = Xyz::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component along one axis
    pub const fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Dot product
    pub fn dot(&self, other: Xyz) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product
    pub fn cross(&self, other: Xyz) -> Xyz {
        Xyz::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Euclidean length
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.dot(*self))
    }

    /// Unit vector in the same direction, or `None` for a zero vector
    pub fn normalized(&self) -> Option<Xyz> {
        let len = self.magnitude();
        if len > f32::EPSILON {
            Some(self.scale(1.0 / len))
        } else {
            None
        }
    }

    /// Multiply every component by `k`
    pub fn scale(&self, k: f32) -> Xyz {
        Xyz::new(self.x * k, self.y * k, self.z * k)
    }
}

impl Add for Xyz {
    type Output = Xyz;

    fn add(self, rhs: Xyz) -> Xyz {
        Xyz::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Xyz {
    type Output = Xyz;

    fn sub(self, rhs: Xyz) -> Xyz {
        Xyz::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_components() {
        let p = Xyz::new(1.0, 2.0, 3.0);
        assert_eq!(p.axis(Axis::X), 1.0);
        assert_eq!(p.axis(Axis::Y), 2.0);
        assert_eq!(p.axis(Axis::Z), 3.0);

        let letters: [char; 3] = Axis::ALL.map(|a| a.letter());
        assert_eq!(letters, ['X', 'Y', 'Z']);
    }

    #[test]
    fn test_cross_of_unit_axes() {
        let x = Xyz::new(1.0, 0.0, 0.0);
        let y = Xyz::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(y), Xyz::new(0.0, 0.0, 1.0));
        assert_eq!(y.cross(x), Xyz::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_normalized() {
        let v = Xyz::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!(libm::fabsf(v.magnitude() - 1.0) < 1e-6);
        assert!(libm::fabsf(v.x - 0.6) < 1e-6);

        assert!(Xyz::ZERO.normalized().is_none());
    }

    #[test]
    fn test_add_sub() {
        let a = Xyz::new(1.0, 2.0, 3.0);
        let b = Xyz::new(0.5, 0.5, 0.5);
        assert_eq!(a - b, Xyz::new(0.5, 1.5, 2.5));
        assert_eq!((a - b) + b, a);
    }
}
