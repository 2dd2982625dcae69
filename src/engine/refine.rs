use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::domain::{DockPose, Placement};
use crate::engine::scoring::ScoreFunction;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("cycle and trial counts must be at least 1")]
    EmptySchedule,
    #[error("Monte Carlo temperature must be positive, got {0}")]
    NonPositiveTemperature(f64),
    #[error("move magnitudes must be positive")]
    NonPositiveMoves,
}

/// Parameters of the Monte-Carlo-plus-minimization protocol.
///
/// The cycle count is a protocol constant, not a per-call knob; two cycles
/// of trial moves with interleaved minimization is the standard high-
/// resolution schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McmConfig {
    pub cycles: usize,
    pub trials_per_cycle: usize,
    /// Translation move magnitude (Å).
    pub trans_mag: f64,
    /// Rotation move magnitude (rad).
    pub rot_mag: f64,
    /// Metropolis temperature (score units).
    pub kt: f64,
    /// Pattern-search sweeps of the inner minimizer.
    pub min_iterations: usize,
}

impl Default for McmConfig {
    fn default() -> Self {
        Self {
            cycles: 2,
            trials_per_cycle: 10,
            trans_mag: 0.1,
            rot_mag: 3.0_f64.to_radians(),
            kt: 0.6,
            min_iterations: 20,
        }
    }
}

impl McmConfig {
    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.cycles == 0 || self.trials_per_cycle == 0 {
            return Err(ProtocolError::EmptySchedule);
        }
        if self.kt <= 0.0 {
            return Err(ProtocolError::NonPositiveTemperature(self.kt));
        }
        if self.trans_mag <= 0.0 || self.rot_mag <= 0.0 {
            return Err(ProtocolError::NonPositiveMoves);
        }
        Ok(())
    }
}

/// Local-search refinement over a structural configuration. Variant chosen
/// once at orchestrator construction by (symmetry × strategy).
///
/// `apply` is stochastic through the caller-passed rng: repeated calls on
/// the same pose yield different results unless the caller seeds the rng.
pub enum RefinementEngine {
    Pairwise(McmProtocol),
    Symmetric(SymmetricMcm),
}

impl RefinementEngine {
    pub fn apply(&self, pose: &mut DockPose, rng: &mut impl Rng) {
        match self {
            RefinementEngine::Pairwise(proto) => proto.apply(pose, rng),
            RefinementEngine::Symmetric(proto) => proto.apply(pose, rng),
        }
    }
}

/// Fixed-cycle Monte-Carlo-minimization over the six pairwise rigid-body
/// degrees of freedom.
pub struct McmProtocol {
    cfg: McmConfig,
    score: Arc<ScoreFunction>,
}

impl McmProtocol {
    pub fn new(cfg: McmConfig, score: Arc<ScoreFunction>) -> Result<Self, ProtocolError> {
        cfg.validate()?;
        Ok(Self { cfg, score })
    }

    pub fn apply(&self, pose: &mut DockPose, rng: &mut impl Rng) {
        debug_assert!(matches!(pose.placement(), Placement::Pair { .. }));
        let t = self.cfg.trans_mag;
        let r = self.cfg.rot_mag;
        let steps = [t, t, t, r, r, r];
        mcm_run(&self.score, &self.cfg, &steps, pose, rng);
    }
}

/// The same protocol generalized to a C_n assembly: moves are sampled in
/// the four symmetric degrees of freedom, so every trial keeps the
/// assembly exactly symmetric. The azimuth step shrinks with the group
/// order, since rotating the master slot displaces every interface at once.
pub struct SymmetricMcm {
    cfg: McmConfig,
    order: usize,
    score: Arc<ScoreFunction>,
}

impl SymmetricMcm {
    pub fn new(
        cfg: McmConfig,
        order: usize,
        score: Arc<ScoreFunction>,
    ) -> Result<Self, ProtocolError> {
        cfg.validate()?;
        Ok(Self { cfg, order, score })
    }

    pub fn apply(&self, pose: &mut DockPose, rng: &mut impl Rng) {
        debug_assert!(matches!(pose.placement(), Placement::Cyclic { .. }));
        let t = self.cfg.trans_mag;
        let r = self.cfg.rot_mag;
        let steps = [t, t, r / self.order as f64, r];
        mcm_run(&self.score, &self.cfg, &steps, pose, rng);
    }
}

/// Shared MCM kernel: per trial, a uniform random perturbation of the
/// placement parameters followed by deterministic pattern-search
/// minimization, accepted by the Metropolis criterion. The lowest-energy
/// placement seen (the starting point included) is restored at the end.
fn mcm_run(
    score: &ScoreFunction,
    cfg: &McmConfig,
    steps: &[f64],
    pose: &mut DockPose,
    rng: &mut impl Rng,
) {
    let mut current = *pose.placement();
    let mut current_e = score.total(pose);
    let mut best = current;
    let mut best_e = current_e;

    for _cycle in 0..cfg.cycles {
        for _trial in 0..cfg.trials_per_cycle {
            let mut params = current.params();
            for (p, s) in params.iter_mut().zip(steps) {
                *p += rng.gen_range(-1.0..1.0) * s;
            }
            pose.set_placement(current.with_params(&params));
            minimize(score, steps, cfg.min_iterations, pose);
            let e = score.total(pose);

            let accept = e < current_e || {
                let delta = e - current_e;
                rng.gen::<f64>() < (-delta / cfg.kt).exp()
            };
            if accept {
                current = *pose.placement();
                current_e = e;
                if e < best_e {
                    best = current;
                    best_e = e;
                }
            } else {
                pose.set_placement(current);
            }
        }
    }

    pose.set_placement(best);
}

/// Greedy pattern search over the placement parameters: sweep each
/// coordinate with the protocol step, halve the step when a full sweep
/// brings no improvement. Deterministic given the starting pose.
fn minimize(score: &ScoreFunction, steps: &[f64], iterations: usize, pose: &mut DockPose) {
    let mut params = pose.placement().params();
    let mut energy = score.total(pose);
    let mut scale = 1.0;

    for _ in 0..iterations {
        let mut improved = false;
        for d in 0..params.len() {
            for sign in [1.0_f64, -1.0] {
                let mut trial = params.clone();
                trial[d] += sign * steps[d] * scale;
                pose.set_placement(pose.placement().with_params(&trial));
                let e = score.total(pose);
                if e < energy - 1e-12 {
                    energy = e;
                    params = trial;
                    improved = true;
                    break;
                }
            }
        }
        if !improved {
            scale *= 0.5;
            if scale < 1e-2 {
                break;
            }
        }
    }

    pose.set_placement(pose.placement().with_params(&params));
}
