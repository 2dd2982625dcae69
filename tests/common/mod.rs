#![allow(dead_code)]

use std::sync::Arc;

use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion};

use rigidock::core::domain::{Atom, Body, DockPose, Placement, Species};
use rigidock::core::symmetry::CyclicSymmetry;
use rigidock::engine::codec::GeometricCodec;
use rigidock::engine::scoring::ScoreFunction;

/// Single carbon-like species: pair equilibrium distance 3.4 Å, contact
/// window 4.25 Å, clash limit 2.89 Å.
pub fn carbon() -> Vec<Species> {
    vec![Species {
        symbol: "C".into(),
        radius: 1.7,
        well_depth: 0.2,
    }]
}

/// Two atoms along x at the pair equilibrium distance, centroid at origin.
pub fn dimer_body(name: &str) -> Body {
    Body::new(
        name,
        vec![
            Atom {
                element_id: 0,
                position: Point3::new(-1.7, 0.0, 0.0),
            },
            Atom {
                element_id: 0,
                position: Point3::new(1.7, 0.0, 0.0),
            },
        ],
    )
}

pub fn single_atom_body(name: &str, position: Point3<f64>) -> Body {
    Body::new(
        name,
        vec![Atom {
            element_id: 0,
            position,
        }],
    )
}

pub fn pair_jump(x: f64, y: f64, z: f64) -> Isometry3<f64> {
    Isometry3::from_parts(Translation3::new(x, y, z), UnitQuaternion::identity())
}

/// Two-body native: receptor fixed at the origin, ligand docked 3.2 Å
/// above it, slightly inside the pair equilibrium distance.
pub fn pair_native() -> DockPose {
    DockPose::pair(
        dimer_body("receptor"),
        dimer_body("ligand"),
        pair_jump(0.0, 3.2, 0.0),
    )
}

pub const PAIR_NATIVE_GENOTYPE: [f64; 6] = [0.0, 3.2, 0.0, 0.0, 0.0, 0.0];
/// Ligand parked 12 Å away: beyond every pair cutoff, zero interaction.
pub const PAIR_FAR_GENOTYPE: [f64; 6] = [0.0, 12.0, 0.0, 0.0, 0.0, 0.0];
/// Ligand buried inside the receptor's clash shell.
pub const PAIR_CLASH_GENOTYPE: [f64; 6] = [0.0, 2.0, 0.0, 0.0, 0.0, 0.0];

/// C3 trimer native: subunits 3.5 Å from the symmetry axis, adjacent
/// copies in contact.
pub fn cyclic_native() -> DockPose {
    DockPose::cyclic(
        dimer_body("subunit"),
        CyclicSymmetry::new(3).expect("order 3 is a valid group"),
        Placement::Cyclic {
            radius: 3.5,
            height: 0.0,
            azimuth: 0.0,
            spin: 0.0,
        },
    )
}

pub const CYCLIC_NATIVE_GENOTYPE: [f64; 4] = [3.5, 0.0, 0.0, 0.0];
/// Assembly expanded far past contact range.
pub const CYCLIC_FAR_GENOTYPE: [f64; 4] = [14.0, 0.0, 0.0, 0.0];

pub fn pair_setup() -> (Arc<GeometricCodec>, Arc<ScoreFunction>) {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let codec = Arc::new(GeometricCodec::new(pair_native(), Arc::clone(&score)));
    (codec, score)
}

pub fn cyclic_setup() -> (Arc<GeometricCodec>, Arc<ScoreFunction>) {
    let score = Arc::new(ScoreFunction::new(&carbon()));
    let codec = Arc::new(GeometricCodec::new(cyclic_native(), Arc::clone(&score)));
    (codec, score)
}
