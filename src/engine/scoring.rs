use crate::core::chemistry::PairTable;
use crate::core::domain::{Body, DockPose, Species};

/// Fraction of the equilibrium distance below which the 12-6 form is
/// replaced by its linear continuation, keeping clashed decodes at high but
/// finite energy.
const SOFT_CORE_SCALE: f64 = 0.6;

/// Softened 12-6 pairwise potential over a rigid-body docking pose.
///
/// The total score is the inter-body interaction energy plus the intra-body
/// terms; bodies are rigid, so the intra-body part is invariant under every
/// pipeline operation and only shifts the score by a constant.
///
/// All operations are deterministic pure functions of the pose.
#[derive(Debug, Clone)]
pub struct ScoreFunction {
    table: PairTable,
}

impl ScoreFunction {
    pub fn new(species: &[Species]) -> Self {
        Self {
            table: PairTable::new(species),
        }
    }

    pub fn table(&self) -> &PairTable {
        &self.table
    }

    /// Energy of one atom pair at squared distance `dist_sq`.
    /// Zero beyond the pair cutoff; the well minimum is `-eps` at `r_eq`.
    #[inline]
    fn pair_energy(&self, id_a: usize, id_b: usize, dist_sq: f64) -> f64 {
        if dist_sq >= self.table.cutoff_sq(id_a, id_b) {
            return 0.0;
        }
        let r0 = self.table.r_eq(id_a, id_b);
        let eps = self.table.eps(id_a, id_b);
        let r = dist_sq.sqrt();
        let r_soft = SOFT_CORE_SCALE * r0;
        if r >= r_soft {
            lj(eps, r0, r)
        } else {
            // Linear continuation below the soft-core radius.
            lj(eps, r0, r_soft) + lj_slope(eps, r0, r_soft) * (r - r_soft)
        }
    }

    fn body_pair(&self, a: &Body, b: &Body) -> f64 {
        let mut energy = 0.0;
        for ai in &a.atoms {
            for bj in &b.atoms {
                let dist_sq = nalgebra::distance_squared(&ai.position, &bj.position);
                energy += self.pair_energy(ai.element_id, bj.element_id, dist_sq);
            }
        }
        energy
    }

    fn intra(&self, body: &Body) -> f64 {
        let n = body.atoms.len();
        let mut energy = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &body.atoms[i];
                let b = &body.atoms[j];
                let dist_sq = nalgebra::distance_squared(&a.position, &b.position);
                energy += self.pair_energy(a.element_id, b.element_id, dist_sq);
            }
        }
        energy
    }

    /// Inter-body interaction energy: every atom pair spanning two distinct
    /// bodies. This is the quantity reported as `interaction_energy`.
    pub fn interaction(&self, pose: &DockPose) -> f64 {
        let bodies = pose.occupied_bodies();
        let mut energy = 0.0;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                energy += self.body_pair(bodies[i], bodies[j]);
            }
        }
        energy
    }

    /// Repulsive part of the inter-body energy (positive pair terms only).
    /// Drives the energy-criterion symmetric slide.
    pub fn repulsion(&self, pose: &DockPose) -> f64 {
        let bodies = pose.occupied_bodies();
        let mut energy = 0.0;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                for ai in &bodies[i].atoms {
                    for bj in &bodies[j].atoms {
                        let dist_sq =
                            nalgebra::distance_squared(&ai.position, &bj.position);
                        let e = self.pair_energy(ai.element_id, bj.element_id, dist_sq);
                        if e > 0.0 {
                            energy += e;
                        }
                    }
                }
            }
        }
        energy
    }

    /// Full score of the pose: interaction energy plus intra-body terms.
    pub fn total(&self, pose: &DockPose) -> f64 {
        let mut energy = self.interaction(pose);
        for body in pose.occupied_bodies() {
            energy += self.intra(body);
        }
        energy
    }
}

#[inline]
fn lj(eps: f64, r0: f64, r: f64) -> f64 {
    let s6 = (r0 / r).powi(6);
    eps * (s6 * s6 - 2.0 * s6)
}

#[inline]
fn lj_slope(eps: f64, r0: f64, r: f64) -> f64 {
    let s6 = (r0 / r).powi(6);
    12.0 * eps * (s6 - s6 * s6) / r
}
