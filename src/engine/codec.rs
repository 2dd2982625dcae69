use std::sync::Arc;

use anyhow::{bail, Result};

use crate::core::domain::DockPose;
use crate::core::spatial;
use crate::engine::scoring::ScoreFunction;

/// Bridge between genotype space and structural space.
///
/// `decode`, `encode` and `score` must be deterministic for identical
/// inputs. Implementations must be thread-safe: `decode` hands each caller
/// an independently owned pose, never a shared working buffer.
pub trait StructureCodec: Send + Sync {
    /// Materializes a genotype into a fresh structural configuration.
    fn decode(&self, genotype: &[f64]) -> Result<DockPose>;

    /// Reads the rigid-body parameters of a configuration back into
    /// genotype space.
    fn encode(&self, pose: &DockPose) -> Vec<f64>;

    /// The scoring-function value of a configuration.
    fn score(&self, pose: &DockPose) -> f64;

    /// Coordinate deviation of the mobile bodies against the native.
    fn rmsd(&self, pose: &DockPose) -> f64;

    /// The fixed native/reference configuration. Read-only, shared across
    /// all invocations.
    fn native(&self) -> Arc<DockPose>;
}

/// The shipped codec: decodes by cloning the native pose's templates and
/// installing the genotype as its rigid-body placement.
pub struct GeometricCodec {
    native: Arc<DockPose>,
    score: Arc<ScoreFunction>,
}

impl GeometricCodec {
    pub fn new(native: DockPose, score: Arc<ScoreFunction>) -> Self {
        Self {
            native: Arc::new(native),
            score,
        }
    }
}

impl StructureCodec for GeometricCodec {
    fn decode(&self, genotype: &[f64]) -> Result<DockPose> {
        let expected = self.native.placement().dof();
        if genotype.len() != expected {
            bail!(
                "genotype carries {} parameters, system expects {}",
                genotype.len(),
                expected
            );
        }
        let mut pose = (*self.native).clone();
        pose.set_placement(pose.placement().with_params(genotype));
        Ok(pose)
    }

    fn encode(&self, pose: &DockPose) -> Vec<f64> {
        pose.placement().params()
    }

    fn score(&self, pose: &DockPose) -> f64 {
        self.score.total(pose)
    }

    fn rmsd(&self, pose: &DockPose) -> f64 {
        spatial::rmsd(pose.mobiles(), self.native.mobiles())
    }

    fn native(&self) -> Arc<DockPose> {
        Arc::clone(&self.native)
    }
}
