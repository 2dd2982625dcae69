use std::f64::consts::PI;
use std::sync::Arc;

use crossbeam_channel::unbounded;

use rigidock::solvers::de::{DeParams, DifferentialEvolution};
use rigidock::solvers::local::{LocalSearch, LocalSearchConfig, Strategy};
use rigidock::solvers::SolverEvent;

use crate::common::pair_setup;

mod common;

fn pair_refiner(config: LocalSearchConfig) -> Arc<LocalSearch> {
    let (codec, score) = pair_setup();
    Arc::new(LocalSearch::new(codec, score, config, None).expect("valid configuration"))
}

fn pair_bounds() -> Vec<(f64, f64)> {
    vec![
        (-8.0, 8.0),
        (-8.0, 8.0),
        (-8.0, 8.0),
        (-PI, PI),
        (-PI, PI),
        (-PI, PI),
    ]
}

#[test]
fn test_de_flow() {
    let refiner = pair_refiner(LocalSearchConfig {
        strategy: Strategy::SlideOnly,
        protocol: None,
        ..Default::default()
    });
    let params = DeParams {
        population_size: 8,
        max_generations: 4,
        bounds: pair_bounds(),
        seed: 123,
        ..Default::default()
    };
    let de = DifferentialEvolution::new(refiner, params);

    let (tx, rx) = unbounded();
    de.solve(tx);

    let mut finished = false;
    let mut received_stats = false;
    let mut best_fitness = f64::MAX;

    for msg in rx {
        match msg {
            SolverEvent::Finished => finished = true,
            SolverEvent::GenerationUpdate(stats) => {
                received_stats = true;
                assert_eq!(stats.pop_size, 8);
                assert!(stats.best_fitness <= stats.avg_fitness);
                assert!(stats.avg_fitness <= stats.worst_fitness);
            }
            SolverEvent::NewBest(ind) => best_fitness = ind.fitness,
            _ => {}
        }
    }

    assert!(finished, "DE did not finish");
    assert!(received_stats, "DE did not send stats");
    // Intra-body terms alone score -0.4; contact adds attractive energy.
    assert!(
        best_fitness < -0.45,
        "sliding candidates into contact should reach attractive energy, got {}",
        best_fitness
    );
}

#[test]
fn test_de_is_reproducible_for_a_fixed_seed() {
    let run = || {
        let refiner = pair_refiner(LocalSearchConfig::default());
        let params = DeParams {
            population_size: 6,
            max_generations: 3,
            bounds: pair_bounds(),
            seed: 99,
            ..Default::default()
        };
        let de = DifferentialEvolution::new(refiner, params);
        let (tx, rx) = unbounded();
        de.solve(tx);

        let mut best = None;
        for msg in rx {
            if let SolverEvent::NewBest(ind) = msg {
                best = Some(ind);
            }
        }
        best.expect("a best candidate is always reported")
    };

    let a = run();
    let b = run();
    assert_eq!(a.fitness, b.fitness);
    assert_eq!(a.genotype, b.genotype);
}

#[test]
fn test_de_rejects_mismatched_bounds() {
    let refiner = pair_refiner(LocalSearchConfig::default());
    let params = DeParams {
        population_size: 8,
        max_generations: 4,
        bounds: vec![(-1.0, 1.0); 3], // genotype needs 6
        ..Default::default()
    };
    let de = DifferentialEvolution::new(refiner, params);

    let (tx, rx) = unbounded();
    de.solve(tx);

    let events: Vec<SolverEvent> = rx.iter().collect();
    assert!(events
        .iter()
        .any(|e| matches!(e, SolverEvent::Log(msg) if msg.starts_with("CRITICAL"))));
    assert!(matches!(events.last(), Some(SolverEvent::Finished)));
    assert!(!events
        .iter()
        .any(|e| matches!(e, SolverEvent::GenerationUpdate(_))));
}
