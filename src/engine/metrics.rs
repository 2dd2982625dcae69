use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::domain::DockPose;
use crate::core::spatial;
use crate::engine::scoring::ScoreFunction;

/// Atoms within this distance (Å) of another body in the native structure
/// belong to the contact interface.
const INTERFACE_CUTOFF: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub rmsd: f64,
    pub interaction_energy: f64,
    pub interface_rmsd: f64,
}

/// Computes docking-accuracy metrics of a configuration against the held
/// native structure. The interface atom set is derived from the native once
/// at construction and shared read-only across all invocations; `evaluate`
/// is a pure function of the pose.
pub struct QualityEvaluator {
    native: Arc<DockPose>,
    score: Arc<ScoreFunction>,
    /// `(body, atom)` indices into the canonical occupied-body ordering.
    interface: Vec<(usize, usize)>,
}

impl QualityEvaluator {
    pub fn new(native: Arc<DockPose>, score: Arc<ScoreFunction>) -> Self {
        let interface = interface_atoms(&native);
        Self {
            native,
            score,
            interface,
        }
    }

    pub fn interface_len(&self) -> usize {
        self.interface.len()
    }

    /// Always invoked by the pipeline, refined or not. When the native has
    /// no inter-body contacts the interface set is empty and the overall
    /// mobile RMSD is reported in its place.
    pub fn evaluate(&self, pose: &DockPose) -> QualityMetrics {
        let rmsd = spatial::rmsd(pose.mobiles(), self.native.mobiles());
        let interaction_energy = self.score.interaction(pose);
        let interface_rmsd = if self.interface.is_empty() {
            rmsd
        } else {
            spatial::rmsd_indexed(
                &pose.occupied_bodies(),
                &self.native.occupied_bodies(),
                &self.interface,
            )
        };
        QualityMetrics {
            rmsd,
            interaction_energy,
            interface_rmsd,
        }
    }
}

/// Atoms of any body lying within [`INTERFACE_CUTOFF`] of an atom of a
/// different body.
fn interface_atoms(pose: &DockPose) -> Vec<(usize, usize)> {
    let bodies = pose.occupied_bodies();
    let cutoff_sq = INTERFACE_CUTOFF * INTERFACE_CUTOFF;
    let mut out = Vec::new();

    for (i, body) in bodies.iter().enumerate() {
        for (a, atom) in body.atoms.iter().enumerate() {
            let near_other = bodies.iter().enumerate().any(|(j, other)| {
                j != i
                    && other.atoms.iter().any(|b| {
                        nalgebra::distance_squared(&atom.position, &b.position) <= cutoff_sq
                    })
            });
            if near_other {
                out.push((i, a));
            }
        }
    }
    out
}
