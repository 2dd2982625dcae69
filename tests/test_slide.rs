use std::sync::Arc;

use rigidock::core::domain::Placement;
use rigidock::core::spatial;
use rigidock::engine::scoring::ScoreFunction;
use rigidock::engine::slide::{PairwiseSlide, SlideCriterion, SymmetricSlide};

use crate::common::{carbon, cyclic_native, pair_jump, pair_native};

mod common;

#[test]
fn test_pairwise_slide_from_separation() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = PairwiseSlide::new(Arc::clone(&score));

    let mut pose = pair_native();
    pose.set_placement(Placement::Pair {
        jump: pair_jump(0.0, 12.0, 0.0),
    });
    slide.apply(&mut pose);

    let table = score.table();
    assert!(spatial::bodies_in_contact(
        pose.anchor(),
        &pose.mobiles()[0],
        table
    ));
    assert!(!spatial::bodies_clash(pose.anchor(), &pose.mobiles()[0], table));

    // First contact of the vertical atom pairs sits at 4.25 Å.
    let y = pose.placement().params()[1];
    assert!((y - 4.25).abs() < 1e-3, "slid to y = {}", y);
}

#[test]
fn test_pairwise_slide_backs_out_of_clash() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = PairwiseSlide::new(Arc::clone(&score));

    let mut pose = pair_native();
    pose.set_placement(Placement::Pair {
        jump: pair_jump(0.0, 2.0, 0.0),
    });
    slide.apply(&mut pose);

    let table = score.table();
    assert!(!spatial::bodies_clash(pose.anchor(), &pose.mobiles()[0], table));
    assert!(spatial::bodies_in_contact(
        pose.anchor(),
        &pose.mobiles()[0],
        table
    ));
}

#[test]
fn test_pairwise_slide_preserves_orientation() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = PairwiseSlide::new(score);

    let mut pose = pair_native();
    let start = pose.placement().with_params(&[0.0, 12.0, 0.0, 0.1, 0.0, 0.4]);
    pose.set_placement(start);
    slide.apply(&mut pose);

    let params = pose.placement().params();
    assert!((params[3] - 0.1).abs() < 1e-9);
    assert!((params[4]).abs() < 1e-9);
    assert!((params[5] - 0.4).abs() < 1e-9);
}

#[test]
fn test_pairwise_slide_is_deterministic() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = PairwiseSlide::new(score);

    let run = || {
        let mut pose = pair_native();
        pose.set_placement(Placement::Pair {
            jump: pair_jump(0.0, 12.0, 0.0),
        });
        slide.apply(&mut pose);
        pose.placement().params()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_symmetric_slide_to_first_contact() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = SymmetricSlide::new(SlideCriterion::Contact, Arc::clone(&score));

    let mut pose = cyclic_native();
    pose.set_placement(Placement::Cyclic {
        radius: 14.0,
        height: 0.0,
        azimuth: 0.0,
        spin: 0.0,
    });
    slide.apply(&mut pose);

    let table = score.table();
    let touching = (1..3).any(|k| {
        spatial::bodies_in_contact(&pose.mobiles()[0], &pose.mobiles()[k], table)
    });
    let clashed = (1..3).any(|k| {
        spatial::bodies_clash(&pose.mobiles()[0], &pose.mobiles()[k], table)
    });
    assert!(touching);
    assert!(!clashed);

    let params = pose.placement().params();
    assert!(params[0] < 14.0, "radius should shrink, got {}", params[0]);
    // Height, azimuth and spin are untouched by the radial slide.
    assert!((params[1]).abs() < 1e-12);
    assert!((params[2]).abs() < 1e-12);
    assert!((params[3]).abs() < 1e-12);
}

#[test]
fn test_symmetric_slide_repulsion_criterion() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = SymmetricSlide::new(
        SlideCriterion::Repulsion { threshold: 10.0 },
        Arc::clone(&score),
    );

    let mut pose = cyclic_native();
    pose.set_placement(Placement::Cyclic {
        radius: 14.0,
        height: 0.0,
        azimuth: 0.0,
        spin: 0.0,
    });
    slide.apply(&mut pose);

    // Stops one stage before crossing the repulsion threshold.
    assert!(score.repulsion(&pose) <= 10.0);
    let radius = pose.placement().params()[0];
    assert!(radius < 14.0);
    assert!(radius > 0.5);
}

#[test]
fn test_symmetric_slide_expands_clashed_assembly() {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let slide = SymmetricSlide::new(SlideCriterion::Contact, Arc::clone(&score));

    let mut pose = cyclic_native();
    pose.set_placement(Placement::Cyclic {
        radius: 2.0,
        height: 0.0,
        azimuth: 0.0,
        spin: 0.0,
    });
    slide.apply(&mut pose);

    let table = score.table();
    let clashed = (1..3).any(|k| {
        spatial::bodies_clash(&pose.mobiles()[0], &pose.mobiles()[k], table)
    });
    assert!(!clashed);
    assert!(pose.placement().params()[0] > 2.0);
}
