use std::sync::Arc;

use crossbeam_channel::Sender;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::domain::Individual;
use crate::solvers::local::LocalSearch;
use crate::solvers::{GenStats, SolverEvent};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeParams {
    pub population_size: usize,
    pub max_generations: usize,
    /// Differential weight F.
    pub weight: f64,
    /// Crossover probability CR.
    pub crossover_rate: f64,
    /// Per-gene search bounds; length must match the genotype arity.
    pub bounds: Vec<(f64, f64)>,
    /// Run the refinement pipeline on every candidate (memetic mode).
    pub local_search: bool,
    pub seed: u64,
}

impl Default for DeParams {
    fn default() -> Self {
        Self {
            population_size: 32,
            max_generations: 50,
            weight: 0.8,
            crossover_rate: 0.9,
            bounds: Vec::new(),
            local_search: true,
            seed: 0,
        }
    }
}

/// rand/1/bin differential evolution over docking genotypes.
///
/// Every candidate is materialized, refined and scored through the shared
/// [`LocalSearch`] pipeline; trial evaluations within a generation run in
/// parallel, each on its own decoded pose. Runs are reproducible for a
/// fixed seed: all stochastic kernels draw from generators derived from it.
pub struct DifferentialEvolution {
    refiner: Arc<LocalSearch>,
    params: DeParams,
}

impl DifferentialEvolution {
    pub fn new(refiner: Arc<LocalSearch>, params: DeParams) -> Self {
        Self { refiner, params }
    }

    pub fn solve(&self, tx: Sender<SolverEvent>) {
        let dof = self.refiner.genotype_len();
        if self.params.bounds.len() != dof {
            let _ = tx.send(SolverEvent::Log(format!(
                "CRITICAL: {} gene bounds configured, genotype needs {}.",
                self.params.bounds.len(),
                dof
            )));
            let _ = tx.send(SolverEvent::Finished);
            return;
        }
        if self.params.population_size < 4 {
            let _ = tx.send(SolverEvent::Log(
                "CRITICAL: differential evolution needs a population of at least 4.".to_string(),
            ));
            let _ = tx.send(SolverEvent::Finished);
            return;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);

        // 1. Initialization
        let _ = tx.send(SolverEvent::Log("Initializing population...".to_string()));
        let genotypes: Vec<Vec<f64>> = (0..self.params.population_size)
            .map(|_| {
                self.params
                    .bounds
                    .iter()
                    .map(|&(lo, hi)| rng.gen_range(lo..hi))
                    .collect()
            })
            .collect();

        let mut population: Vec<Individual> = self
            .refine_batch(genotypes, &mut rng)
            .into_iter()
            .flatten()
            .collect();

        // Mutant construction samples three distinct partners per target.
        if population.len() < 4 {
            let _ = tx.send(SolverEvent::Log(
                "CRITICAL: too few evaluable candidates in the initial population.".to_string(),
            ));
            let _ = tx.send(SolverEvent::Finished);
            return;
        }

        let mut total_evals = population.len();
        let mut best = population
            .iter()
            .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .cloned()
            .expect("population is non-empty");
        let _ = tx.send(SolverEvent::NewBest(best.clone()));

        // 2. Evolution Loop
        for gen in 1..=self.params.max_generations {
            let n = population.len();

            // A. Trial construction (rand/1/bin)
            let trials: Vec<Vec<f64>> = (0..n)
                .map(|i| {
                    let (a, b, c) = self.pick_distinct(n, i, &mut rng);
                    let jrand = rng.gen_range(0..dof);
                    (0..dof)
                        .map(|d| {
                            let mutant = population[a].genotype[d]
                                + self.params.weight
                                    * (population[b].genotype[d] - population[c].genotype[d]);
                            let gene = if d == jrand
                                || rng.gen::<f64>() < self.params.crossover_rate
                            {
                                mutant
                            } else {
                                population[i].genotype[d]
                            };
                            let (lo, hi) = self.params.bounds[d];
                            gene.clamp(lo, hi)
                        })
                        .collect()
                })
                .collect();

            // B. Refinement + selection
            let refined = self.refine_batch(trials, &mut rng);
            let mut accepted = 0;
            for (i, trial) in refined.into_iter().enumerate() {
                if let Some(trial) = trial {
                    total_evals += 1;
                    if trial.fitness <= population[i].fitness {
                        population[i] = trial;
                        accepted += 1;
                    }
                }
            }

            // C. Best tracking
            let gen_best = population
                .iter()
                .min_by(|a, b| a.fitness.total_cmp(&b.fitness))
                .expect("population is non-empty");
            if gen_best.fitness < best.fitness {
                best = gen_best.clone();
                let _ = tx.send(SolverEvent::NewBest(best.clone()));
            }

            // D. Telemetry
            let sum: f64 = population.iter().map(|ind| ind.fitness).sum();
            let worst = population
                .iter()
                .map(|ind| ind.fitness)
                .fold(f64::MIN, f64::max);
            let _ = tx.send(SolverEvent::GenerationUpdate(GenStats {
                generation: gen,
                best_fitness: best.fitness,
                avg_fitness: sum / n as f64,
                worst_fitness: worst,
                trial_acceptance: accepted as f64 / n as f64,
                pop_size: n,
                evals: total_evals,
            }));
        }

        let _ = tx.send(SolverEvent::Log(format!(
            "DE finished. Total evaluations: {}",
            total_evals
        )));
        let _ = tx.send(SolverEvent::Finished);
    }

    // --- Helpers ---

    /// Refines a batch of genotypes in parallel, preserving order. Seeds
    /// for the per-candidate generators are drawn serially from the master
    /// generator, so runs are reproducible regardless of scheduling.
    fn refine_batch(
        &self,
        genotypes: Vec<Vec<f64>>,
        rng: &mut ChaCha8Rng,
    ) -> Vec<Option<Individual>> {
        let seeds: Vec<u64> = (0..genotypes.len()).map(|_| rng.gen()).collect();
        genotypes
            .par_iter()
            .zip(seeds.par_iter())
            .map(|(genotype, &seed)| {
                let mut worker_rng = ChaCha8Rng::seed_from_u64(seed);
                match self.refiner.process_with_rng(
                    genotype,
                    self.params.local_search,
                    &mut worker_rng,
                ) {
                    Ok(outcome) => Some(outcome.individual),
                    Err(e) => {
                        log::warn!("candidate evaluation failed: {e:#}");
                        None
                    }
                }
            })
            .collect()
    }

    /// Three distinct population indices, all different from `target`.
    fn pick_distinct(
        &self,
        n: usize,
        target: usize,
        rng: &mut ChaCha8Rng,
    ) -> (usize, usize, usize) {
        let mut pick = |taken: &[usize]| loop {
            let idx = rng.gen_range(0..n);
            if idx != target && !taken.contains(&idx) {
                return idx;
            }
        };
        let a = pick(&[]);
        let b = pick(&[a]);
        let c = pick(&[a, b]);
        (a, b, c)
    }
}
