use crate::core::domain::Species;
use serde::{Deserialize, Serialize};

/// Fraction of the equilibrium distance below which a pair counts as a
/// steric clash.
pub const CLASH_SCALE: f64 = 0.85;
/// Fraction of the equilibrium distance below which a pair counts as in
/// contact. Contact is reached before clash on any inward approach.
pub const CONTACT_SCALE: f64 = 1.25;
/// Non-bonded interactions are ignored beyond this multiple of the
/// equilibrium distance.
pub const CUTOFF_SCALE: f64 = 2.5;

/// Flattened per-species-pair matrices of pre-computed non-bonded
/// thresholds. Access is O(1) via `index = i * N + j`.
///
/// Squared distances are stored so the inner loops never call sqrt().
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairTable {
    num_species: usize,
    /// Equilibrium distance r_i + r_j (Å).
    r_eq: Vec<f64>,
    /// Geometric-mean well depth (kcal/mol).
    eps: Vec<f64>,
    clash_sq: Vec<f64>,
    contact_sq: Vec<f64>,
    cutoff_sq: Vec<f64>,
}

impl PairTable {
    pub fn new(species: &[Species]) -> Self {
        let n = species.len();
        let mut r_eq = vec![0.0; n * n];
        let mut eps = vec![0.0; n * n];
        let mut clash_sq = vec![0.0; n * n];
        let mut contact_sq = vec![0.0; n * n];
        let mut cutoff_sq = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..n {
                let r0 = species[i].radius + species[j].radius;
                let e0 = (species[i].well_depth * species[j].well_depth).sqrt();
                let idx = i * n + j;
                r_eq[idx] = r0;
                eps[idx] = e0;
                clash_sq[idx] = (r0 * CLASH_SCALE).powi(2);
                contact_sq[idx] = (r0 * CONTACT_SCALE).powi(2);
                cutoff_sq[idx] = (r0 * CUTOFF_SCALE).powi(2);
            }
        }

        Self {
            num_species: n,
            r_eq,
            eps,
            clash_sq,
            contact_sq,
            cutoff_sq,
        }
    }

    pub fn num_species(&self) -> usize {
        self.num_species
    }

    #[inline(always)]
    pub fn r_eq(&self, id_a: usize, id_b: usize) -> f64 {
        self.r_eq[id_a * self.num_species + id_b]
    }

    #[inline(always)]
    pub fn eps(&self, id_a: usize, id_b: usize) -> f64 {
        self.eps[id_a * self.num_species + id_b]
    }

    /// Squared distance below which two atoms are considered clashing.
    #[inline(always)]
    pub fn clash_sq(&self, id_a: usize, id_b: usize) -> f64 {
        self.clash_sq[id_a * self.num_species + id_b]
    }

    /// Squared distance below which two atoms are considered in contact.
    #[inline(always)]
    pub fn contact_sq(&self, id_a: usize, id_b: usize) -> f64 {
        self.contact_sq[id_a * self.num_species + id_b]
    }

    /// Squared interaction cutoff for this pair.
    #[inline(always)]
    pub fn cutoff_sq(&self, id_a: usize, id_b: usize) -> f64 {
        self.cutoff_sq[id_a * self.num_species + id_b]
    }
}
