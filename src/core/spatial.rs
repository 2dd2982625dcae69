use crate::core::chemistry::PairTable;
use crate::core::domain::Body;

/// Returns `true` if any atom pair across the two bodies sits inside its
/// clash distance.
pub fn bodies_clash(a: &Body, b: &Body, table: &PairTable) -> bool {
    for ai in &a.atoms {
        for bj in &b.atoms {
            let dist_sq = nalgebra::distance_squared(&ai.position, &bj.position);
            if dist_sq < table.clash_sq(ai.element_id, bj.element_id) {
                return true;
            }
        }
    }
    false
}

/// Returns `true` if any atom pair across the two bodies sits inside its
/// contact distance.
pub fn bodies_in_contact(a: &Body, b: &Body, table: &PairTable) -> bool {
    for ai in &a.atoms {
        for bj in &b.atoms {
            let dist_sq = nalgebra::distance_squared(&ai.position, &bj.position);
            if dist_sq <= table.contact_sq(ai.element_id, bj.element_id) {
                return true;
            }
        }
    }
    false
}

/// Smallest signed separation-to-contact gap over all atom pairs across the
/// two bodies: negative once in contact, positive while separated.
/// Infinite when either body is empty.
pub fn contact_gap(a: &Body, b: &Body, table: &PairTable) -> f64 {
    let mut gap = f64::INFINITY;
    for ai in &a.atoms {
        for bj in &b.atoms {
            let dist = nalgebra::distance(&ai.position, &bj.position);
            let contact = table.contact_sq(ai.element_id, bj.element_id).sqrt();
            gap = gap.min(dist - contact);
        }
    }
    gap
}

/// Coordinate RMSD between two equally-shaped body lists, computed in the
/// fixed world frame (no superposition).
///
/// **Invariant**: both lists must carry the same bodies in the same atom
/// order; the codec guarantees this for poses decoded from one system.
pub fn rmsd(a: &[Body], b: &[Body]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for (body_a, body_b) in a.iter().zip(b.iter()) {
        debug_assert_eq!(body_a.atoms.len(), body_b.atoms.len());
        for (atom_a, atom_b) in body_a.atoms.iter().zip(body_b.atoms.iter()) {
            sum_sq += nalgebra::distance_squared(&atom_a.position, &atom_b.position);
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    (sum_sq / count as f64).sqrt()
}

/// RMSD restricted to the atoms named by `(body index, atom index)` pairs
/// into the canonical occupied-body ordering.
pub fn rmsd_indexed(a: &[&Body], b: &[&Body], indices: &[(usize, usize)]) -> f64 {
    if indices.is_empty() {
        return 0.0;
    }
    let mut sum_sq = 0.0;
    for &(body_idx, atom_idx) in indices {
        let pa = a[body_idx].atoms[atom_idx].position;
        let pb = b[body_idx].atoms[atom_idx].position;
        sum_sq += nalgebra::distance_squared(&pa, &pb);
    }
    (sum_sq / indices.len() as f64).sqrt()
}
