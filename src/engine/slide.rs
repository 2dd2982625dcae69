use std::sync::Arc;

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::core::domain::{DockPose, Placement};
use crate::core::spatial;
use crate::engine::scoring::ScoreFunction;

/// Translation step used while marching bodies together/apart (Å).
const SLIDE_STEP: f64 = 0.5;
/// Upper bound on marching steps in either direction.
const MAX_SLIDE_STEPS: usize = 240;
/// Bisection refinements after the contact interval is bracketed.
const BISECT_ITERS: usize = 24;

/// Stop condition for the staged symmetric slide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SlideCriterion {
    /// Stop at the first inter-subunit atomic contact.
    Contact,
    /// Stop once the assembly's repulsive energy crosses `threshold`, then
    /// back off one stage.
    Repulsion { threshold: f64 },
}

/// Brings rigid bodies into non-overlapping contact before refinement.
/// Variant chosen once at orchestrator construction; `apply` is in-place
/// and deterministic. A pose that cannot reach contact is restored
/// unchanged — non-convergence is diagnostic, never an error.
pub enum ContactSlider {
    Pairwise(PairwiseSlide),
    Symmetric(SymmetricSlide),
}

impl ContactSlider {
    pub fn apply(&self, pose: &mut DockPose) {
        match self {
            ContactSlider::Pairwise(slide) => slide.apply(pose),
            ContactSlider::Symmetric(slide) => slide.apply(pose),
        }
    }
}

/// Single-pass slide of the mobile body along the inter-body axis: backs
/// out of any steric clash, then marches in and bisects to the
/// first-contact distance.
pub struct PairwiseSlide {
    score: Arc<ScoreFunction>,
}

impl PairwiseSlide {
    pub fn new(score: Arc<ScoreFunction>) -> Self {
        Self { score }
    }

    pub fn apply(&self, pose: &mut DockPose) {
        let Placement::Pair { jump: base } = *pose.placement() else {
            debug_assert!(false, "pairwise slide on a symmetric pose");
            return;
        };
        let table = self.score.table();

        let mut axis = pose.mobiles()[0].centroid() - pose.anchor().centroid();
        if axis.norm() < 1e-9 {
            axis = Vector3::z();
        } else {
            axis.normalize_mut();
        }

        let place = |pose: &mut DockPose, t: f64| {
            let shift = Isometry3::from_parts(
                Translation3::from(axis * t),
                UnitQuaternion::identity(),
            );
            pose.set_placement(Placement::Pair { jump: shift * base });
        };
        let clashed =
            |pose: &DockPose| spatial::bodies_clash(pose.anchor(), &pose.mobiles()[0], table);
        let touching =
            |pose: &DockPose| spatial::bodies_in_contact(pose.anchor(), &pose.mobiles()[0], table);

        // Retreat until the clash clears.
        let mut t = 0.0;
        let mut steps = 0;
        while clashed(pose) {
            if steps >= MAX_SLIDE_STEPS {
                place(pose, 0.0);
                log::debug!("pairwise slide: could not clear clash, pose left unchanged");
                return;
            }
            t += SLIDE_STEP;
            place(pose, t);
            steps += 1;
        }

        if touching(pose) {
            return;
        }

        // March in until first contact, then bisect the bracket.
        let mut lo = t; // separated
        steps = 0;
        loop {
            if steps >= MAX_SLIDE_STEPS {
                place(pose, 0.0);
                log::debug!("pairwise slide: no contact within range, pose left unchanged");
                return;
            }
            t -= SLIDE_STEP;
            place(pose, t);
            steps += 1;
            if touching(pose) {
                break;
            }
            lo = t;
        }

        let mut hi = t; // in contact
        for _ in 0..BISECT_ITERS {
            let mid = 0.5 * (lo + hi);
            place(pose, mid);
            if touching(pose) {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        place(pose, hi);
    }
}

/// Staged radial slide of a C_n assembly toward its symmetry axis. At every
/// stage the master subunit is checked against each symmetric copy in the
/// group's traversal order; only the radius moves, so symmetry is preserved
/// exactly.
pub struct SymmetricSlide {
    criterion: SlideCriterion,
    score: Arc<ScoreFunction>,
}

impl SymmetricSlide {
    pub fn new(criterion: SlideCriterion, score: Arc<ScoreFunction>) -> Self {
        Self { criterion, score }
    }

    pub fn criterion(&self) -> SlideCriterion {
        self.criterion
    }

    pub fn apply(&self, pose: &mut DockPose) {
        let Placement::Cyclic {
            radius: start_radius,
            height,
            azimuth,
            spin,
        } = *pose.placement()
        else {
            debug_assert!(false, "symmetric slide on a pairwise pose");
            return;
        };
        let table = self.score.table();

        let place = |pose: &mut DockPose, radius: f64| {
            pose.set_placement(Placement::Cyclic {
                radius,
                height,
                azimuth,
                spin,
            });
        };
        let clashed = |pose: &DockPose| {
            let order = pose.mobiles().len();
            (1..order).any(|k| {
                spatial::bodies_clash(&pose.mobiles()[0], &pose.mobiles()[k], table)
            })
        };
        let touching = |pose: &DockPose| {
            let order = pose.mobiles().len();
            (1..order).any(|k| {
                spatial::bodies_in_contact(&pose.mobiles()[0], &pose.mobiles()[k], table)
            })
        };

        // Expand until the assembly clears its clashes.
        let mut radius = start_radius;
        let mut steps = 0;
        while clashed(pose) {
            if steps >= MAX_SLIDE_STEPS {
                place(pose, start_radius);
                log::debug!("symmetric slide: could not clear clash, pose left unchanged");
                return;
            }
            radius += SLIDE_STEP;
            place(pose, radius);
            steps += 1;
        }

        match self.criterion {
            SlideCriterion::Contact => {
                if touching(pose) {
                    return;
                }
                let mut lo = radius; // separated
                steps = 0;
                loop {
                    if steps >= MAX_SLIDE_STEPS || radius <= SLIDE_STEP {
                        place(pose, start_radius);
                        log::debug!(
                            "symmetric slide: no contact within range, pose left unchanged"
                        );
                        return;
                    }
                    radius -= SLIDE_STEP;
                    place(pose, radius);
                    steps += 1;
                    if touching(pose) {
                        break;
                    }
                    lo = radius;
                }
                let mut hi = radius; // in contact
                for _ in 0..BISECT_ITERS {
                    let mid = 0.5 * (lo + hi);
                    place(pose, mid);
                    if touching(pose) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                place(pose, hi);
            }
            SlideCriterion::Repulsion { threshold } => {
                let mut prev = radius;
                steps = 0;
                while self.score.repulsion(pose) <= threshold {
                    if steps >= MAX_SLIDE_STEPS || radius <= SLIDE_STEP {
                        place(pose, start_radius);
                        log::debug!(
                            "symmetric slide: repulsion threshold unreached, pose left unchanged"
                        );
                        return;
                    }
                    prev = radius;
                    radius -= SLIDE_STEP;
                    place(pose, radius);
                    steps += 1;
                }
                // One stage back from the first over-threshold radius.
                place(pose, prev);
            }
        }
    }
}
