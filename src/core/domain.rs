use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::symmetry::CyclicSymmetry;

// --- Physics Types ---

/// Represents a single chemical species and its non-bonded parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Species {
    pub symbol: String,
    /// Contact radius (Å). Pair equilibrium distance is the sum of radii.
    pub radius: f64,
    /// Dispersion well depth (kcal/mol).
    pub well_depth: f64,
}

impl Default for Species {
    fn default() -> Self {
        Self {
            symbol: "X".to_string(),
            radius: 1.7,
            well_depth: 0.1,
        }
    }
}

/// A single atom instance in a rigid body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Atom {
    pub element_id: usize, // Index into the species list
    pub position: Point3<f64>,
}

/// A named rigid group of atoms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub name: String,
    pub atoms: Vec<Atom>,
}

impl Body {
    pub fn new(name: &str, atoms: Vec<Atom>) -> Self {
        Self {
            name: name.to_string(),
            atoms,
        }
    }

    pub fn centroid(&self) -> Point3<f64> {
        let n = self.atoms.len();
        if n == 0 {
            return Point3::origin();
        }
        let mut sum = Vector3::zeros();
        for atom in &self.atoms {
            sum += atom.position.coords;
        }
        Point3::from(sum / n as f64)
    }

    /// Returns a copy with every atom mapped through `iso`.
    pub fn transformed(&self, iso: &Isometry3<f64>) -> Body {
        let mut out = self.clone();
        for atom in &mut out.atoms {
            atom.position = iso * atom.position;
        }
        out
    }

    /// Returns a copy translated so the centroid sits at the origin.
    /// Subunit templates are stored in this local frame.
    pub fn centered(&self) -> Body {
        let shift = self.centroid().coords;
        let mut out = self.clone();
        for atom in &mut out.atoms {
            atom.position -= shift;
        }
        out
    }
}

// --- Rigid-Body Degrees of Freedom ---

/// The rigid-body placement of the mobile subunit(s).
///
/// The flat parameter vector exposed by [`Placement::params`] is exactly the
/// genotype exchanged with the outer optimizer, so encode/decode round-trips
/// are lossless up to floating-point noise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Placement {
    /// One mobile body relative to a fixed partner.
    /// 6 DOF: translation (Å) plus roll/pitch/yaw Euler angles (rad).
    Pair { jump: Isometry3<f64> },
    /// Master subunit of a C_n assembly. 4 DOF: radial distance from the
    /// symmetry axis, height along it, azimuth of the master slot, and spin
    /// of the subunit about its own vertical axis (rad).
    Cyclic {
        radius: f64,
        height: f64,
        azimuth: f64,
        spin: f64,
    },
}

impl Placement {
    pub fn dof(&self) -> usize {
        match self {
            Placement::Pair { .. } => 6,
            Placement::Cyclic { .. } => 4,
        }
    }

    pub fn params(&self) -> Vec<f64> {
        match self {
            Placement::Pair { jump } => {
                let t = jump.translation.vector;
                let (roll, pitch, yaw) = jump.rotation.euler_angles();
                vec![t.x, t.y, t.z, roll, pitch, yaw]
            }
            Placement::Cyclic {
                radius,
                height,
                azimuth,
                spin,
            } => vec![*radius, *height, *azimuth, *spin],
        }
    }

    /// Builds the same variant from a flat parameter vector.
    ///
    /// Callers must pass exactly [`Placement::dof`] values; the codec checks
    /// arity before reaching this point.
    pub fn with_params(&self, p: &[f64]) -> Placement {
        debug_assert_eq!(p.len(), self.dof());
        match self {
            Placement::Pair { .. } => Placement::Pair {
                jump: Isometry3::from_parts(
                    Translation3::new(p[0], p[1], p[2]),
                    UnitQuaternion::from_euler_angles(p[3], p[4], p[5]),
                ),
            },
            Placement::Cyclic { .. } => Placement::Cyclic {
                radius: p[0],
                height: p[1],
                azimuth: p[2],
                spin: p[3],
            },
        }
    }

    /// World transform of the master (or only) mobile body.
    pub fn master_isometry(&self) -> Isometry3<f64> {
        match self {
            Placement::Pair { jump } => *jump,
            Placement::Cyclic {
                radius,
                height,
                azimuth,
                spin,
            } => {
                let slot = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), *azimuth);
                let out = Translation3::new(*radius, 0.0, *height);
                let twist = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), *spin);
                Isometry3::from_parts(Translation3::identity(), slot)
                    * Isometry3::from_parts(out, twist)
            }
        }
    }
}

// --- The Structural Configuration ---

/// A materialized docking configuration: a fixed anchor body (empty for
/// symmetric assemblies), the mobile subunit template in its local frame,
/// the current rigid-body placement, and the world-frame coordinates derived
/// from it.
///
/// All mutation goes through [`DockPose::set_placement`], which re-derives
/// the coordinates from the template; the structure and its parameter vector
/// cannot drift apart. Each pipeline invocation owns its own pose.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DockPose {
    anchor: Body,
    subunit: Body,
    placement: Placement,
    symmetry: Option<CyclicSymmetry>,
    mobiles: Vec<Body>,
}

impl DockPose {
    /// Two-body configuration: `anchor` stays fixed in the world frame,
    /// `subunit` is re-centered and placed by `jump`.
    pub fn pair(anchor: Body, subunit: Body, jump: Isometry3<f64>) -> Self {
        let mut pose = Self {
            anchor,
            subunit: subunit.centered(),
            placement: Placement::Pair { jump },
            symmetry: None,
            mobiles: Vec::new(),
        };
        pose.materialize();
        pose
    }

    /// C_n assembly of `symmetry.order()` copies of `subunit` around the
    /// global z axis.
    pub fn cyclic(subunit: Body, symmetry: CyclicSymmetry, placement: Placement) -> Self {
        debug_assert!(matches!(placement, Placement::Cyclic { .. }));
        let mut pose = Self {
            anchor: Body::new("", Vec::new()),
            subunit: subunit.centered(),
            placement,
            symmetry: Some(symmetry),
            mobiles: Vec::new(),
        };
        pose.materialize();
        pose
    }

    pub fn anchor(&self) -> &Body {
        &self.anchor
    }

    pub fn subunit(&self) -> &Body {
        &self.subunit
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn symmetry(&self) -> Option<&CyclicSymmetry> {
        self.symmetry.as_ref()
    }

    /// Mobile bodies in world coordinates, master copy first.
    pub fn mobiles(&self) -> &[Body] {
        &self.mobiles
    }

    /// Every body carrying atoms: the anchor (if any) followed by the
    /// mobile copies. Canonical ordering for inter-body iteration.
    pub fn occupied_bodies(&self) -> Vec<&Body> {
        let mut out = Vec::with_capacity(self.mobiles.len() + 1);
        if !self.anchor.atoms.is_empty() {
            out.push(&self.anchor);
        }
        out.extend(self.mobiles.iter());
        out
    }

    /// Replaces the rigid-body placement and re-derives world coordinates.
    pub fn set_placement(&mut self, placement: Placement) {
        debug_assert_eq!(placement.dof(), self.placement.dof());
        self.placement = placement;
        self.materialize();
    }

    fn materialize(&mut self) {
        let master = self.placement.master_isometry();
        match &self.symmetry {
            None => {
                self.mobiles = vec![self.subunit.transformed(&master)];
            }
            Some(sym) => {
                self.mobiles = sym
                    .copy_isometries(&master)
                    .map(|iso| self.subunit.transformed(&iso))
                    .collect();
                for (k, body) in self.mobiles.iter_mut().enumerate() {
                    body.name = format!("{}_{}", self.subunit.name, k);
                }
            }
        }
    }
}

// --- The Unit Exchanged with the Outer Optimizer ---

/// A refined candidate solution. Built once per pipeline invocation and
/// never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Individual {
    pub id: Uuid,
    pub genotype: Vec<f64>,
    /// Score of the configuration after the pipeline ran.
    pub fitness: f64,
    pub rmsd: f64,
    pub interaction_energy: f64,
    pub interface_rmsd: f64,
}

impl Individual {
    pub fn new(
        genotype: Vec<f64>,
        fitness: f64,
        rmsd: f64,
        interaction_energy: f64,
        interface_rmsd: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            genotype,
            fitness,
            rmsd,
            interaction_energy,
            interface_rmsd,
        }
    }
}
