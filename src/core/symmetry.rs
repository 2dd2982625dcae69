use nalgebra::{Isometry3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// Cyclic point group C_n about the global z axis.
///
/// Copy `k` of the assembly is related to the master subunit by a rotation of
/// `2πk/n`; the traversal order used by staged operations is `k = 1..n`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CyclicSymmetry {
    order: usize,
}

impl CyclicSymmetry {
    /// Returns `None` for orders below 2 (a single copy is not an assembly).
    pub fn new(order: usize) -> Option<Self> {
        if order < 2 {
            return None;
        }
        Some(Self { order })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Rotation relating copy `k` to the master subunit.
    pub fn copy_rotation(&self, k: usize) -> UnitQuaternion<f64> {
        let angle = std::f64::consts::TAU * (k as f64) / (self.order as f64);
        UnitQuaternion::from_axis_angle(&Vector3::z_axis(), angle)
    }

    /// World transforms for all copies, master first.
    pub fn copy_isometries<'a>(
        &'a self,
        master: &'a Isometry3<f64>,
    ) -> impl Iterator<Item = Isometry3<f64>> + 'a {
        (0..self.order).map(move |k| {
            Isometry3::from_parts(nalgebra::Translation3::identity(), self.copy_rotation(k))
                * master
        })
    }
}
