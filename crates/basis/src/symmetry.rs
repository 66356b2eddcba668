// This code is part of Qiskit.
//
// (C) Copyright IBM 2025
//
// This code is licensed under the Apache License, Version 2.0. You may
// obtain a copy of this license in the LICENSE.txt file in the root directory
// of this source tree or at http://www.apache.org/licenses/LICENSE-2.0.
//
// Any modifications or derivative works of this code must retain this
// copyright notice, and modified files need to carry a notice indicating
// that they have been altered from the originals.

//! Lattice symmetries: orbit representatives, phases and norms.
//!
//! A group is an ordered list of site permutations with unit-modulus phase
//! factors (typically the characters of a one-dimensional irrep).  Closure is
//! not validated; the group is taken as the caller supplies it.  The engine
//! finds, for any packed state, the lexicographically smallest image over the
//! group (the orbit representative), the phase of the element that maps the
//! state onto it, and the stabilizer phase sum used to weed out null orbits.

use num_complex::Complex64;

use crate::error::BasisError;
use crate::hilbert::HilbertSpace;
use crate::packing::SiteCoding;

/// A second, independent symmetry source composed with every lattice
/// permutation, e.g. a pure-phase symmetry with no site remapping.
pub trait LocalSymmetry {
    fn n_symmetries(&self) -> usize;

    /// Image of `state` under symmetry `index`, with the accompanying phase.
    fn apply_symmetry(&self, state: u64, index: usize) -> (u64, Complex64);
}

/// The identity extension point: one element, no remap, unit phase.
#[derive(Clone, Copy, Debug, Default)]
pub struct TrivialLocalSymmetry;

impl LocalSymmetry for TrivialLocalSymmetry {
    fn n_symmetries(&self) -> usize {
        1
    }

    fn apply_symmetry(&self, state: u64, _index: usize) -> (u64, Complex64) {
        (state, Complex64::new(1.0, 0.0))
    }
}

/// An ordered set of `(permutation, phase)` pairs acting on packed states.
#[derive(Clone, Debug)]
pub struct SymmetryGroup {
    n_sites: u32,
    /// Flattened element-major images: entry `e * n_sites + s` is the site
    /// that element `e` sends site `s` to.
    images: Vec<u32>,
    phases: Vec<Complex64>,
}

impl SymmetryGroup {
    /// Build a group after checking every permutation is a bijection on
    /// `0..n_sites` and that phases pair up one-to-one.
    pub fn new(
        n_sites: u32,
        permutations: &[Vec<u32>],
        phases: Vec<Complex64>,
    ) -> Result<Self, BasisError> {
        if permutations.len() != phases.len() {
            return Err(BasisError::MismatchedPhases {
                n_permutations: permutations.len(),
                n_phases: phases.len(),
            });
        }
        let mut images = Vec::with_capacity(permutations.len() * n_sites as usize);
        for permutation in permutations {
            if permutation.len() != n_sites as usize {
                return Err(BasisError::PermutationWrongLength {
                    len: permutation.len(),
                    n_sites,
                });
            }
            let mut seen = vec![false; n_sites as usize];
            for &image in permutation {
                if image >= n_sites {
                    return Err(BasisError::PermutationOutOfRange {
                        len: permutation.len(),
                        value: image,
                    });
                }
                if seen[image as usize] {
                    return Err(BasisError::PermutationDuplicate { value: image });
                }
                seen[image as usize] = true;
            }
            images.extend_from_slice(permutation);
        }
        Ok(Self {
            n_sites,
            images,
            phases,
        })
    }

    /// The one-element identity group.
    pub fn identity(n_sites: u32) -> Self {
        Self {
            n_sites,
            images: (0..n_sites).collect(),
            phases: vec![Complex64::new(1.0, 0.0)],
        }
    }

    /// The cyclic translation group with momentum character
    /// `exp(-2 pi i k s / n_sites)` on the shift-by-`s` element.
    pub fn cyclic(n_sites: u32, momentum: u32) -> Self {
        let mut images = Vec::with_capacity((n_sites * n_sites) as usize);
        let mut phases = Vec::with_capacity(n_sites as usize);
        for shift in 0..n_sites {
            images.extend((0..n_sites).map(|site| (site + shift) % n_sites));
            let angle = -2.0 * std::f64::consts::PI * f64::from(momentum * shift)
                / f64::from(n_sites);
            phases.push(Complex64::from_polar(1.0, angle));
        }
        Self {
            n_sites,
            images,
            phases,
        }
    }

    #[inline]
    pub fn n_sites(&self) -> u32 {
        self.n_sites
    }

    #[inline]
    pub fn n_elements(&self) -> usize {
        self.phases.len()
    }

    #[inline]
    pub fn phase(&self, element: usize) -> Complex64 {
        self.phases[element]
    }

    #[inline]
    fn permutation(&self, element: usize) -> &[u32] {
        let n = self.n_sites as usize;
        &self.images[element * n..(element + 1) * n]
    }

    /// Image of `state` under group element `element`: the value at each
    /// site moves to the site the permutation names.
    pub fn apply(&self, element: usize, state: u64, coding: SiteCoding) -> u64 {
        let permutation = self.permutation(element);
        let mut image = 0u64;
        for site in 0..self.n_sites {
            image = coding.set(
                image,
                permutation[site as usize],
                coding.get(state, site),
            );
        }
        image
    }

    /// Orbit representative of `state` and the phase mapping `state` onto it.
    pub fn representative(&self, state: u64, coding: SiteCoding) -> (u64, Complex64) {
        self.representative_with(&TrivialLocalSymmetry, state, coding)
    }

    /// [SymmetryGroup::representative] with an extra local-symmetry source
    /// composed after the lattice permutation.
    ///
    /// The minimum image over all composed elements wins; ties keep the first
    /// element in group-major order, so the returned phase always belongs to
    /// an element that maps the input itself onto the representative.
    pub fn representative_with<L: LocalSymmetry>(
        &self,
        local: &L,
        state: u64,
        coding: SiteCoding,
    ) -> (u64, Complex64) {
        let mut best = u64::MAX;
        let mut best_phase = Complex64::new(1.0, 0.0);
        for element in 0..self.n_elements() {
            let permuted = self.apply(element, state, coding);
            for index in 0..local.n_symmetries() {
                let (image, local_phase) = local.apply_symmetry(permuted, index);
                if image < best {
                    best = image;
                    best_phase = self.phase(element) * local_phase;
                }
            }
        }
        (best, best_phase)
    }

    /// Stabilizer phase sum of a representative.
    ///
    /// Orbits whose sum has magnitude at the tolerance or below are null and
    /// are excluded from symmetrized bases.
    pub fn orbit_norm(&self, representative: u64, coding: SiteCoding) -> Complex64 {
        self.orbit_norm_with(&TrivialLocalSymmetry, representative, coding)
    }

    pub fn orbit_norm_with<L: LocalSymmetry>(
        &self,
        local: &L,
        representative: u64,
        coding: SiteCoding,
    ) -> Complex64 {
        let mut sum = Complex64::new(0.0, 0.0);
        for element in 0..self.n_elements() {
            let permuted = self.apply(element, representative, coding);
            for index in 0..local.n_symmetries() {
                let (image, local_phase) = local.apply_symmetry(permuted, index);
                if image == representative {
                    sum += self.phase(element) * local_phase;
                }
            }
        }
        sum
    }
}

/// A symmetry-reduced basis: ascending orbit representatives with the real
/// norms marshalled at the array boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct SymmetrizedBasis {
    representatives: Vec<u64>,
    norms: Vec<f64>,
}

impl SymmetrizedBasis {
    /// Reduce a sector to its non-null orbit representatives.
    ///
    /// A state is kept when it is its own representative and its stabilizer
    /// phase sum survives the tolerance; the stored norm is the square root
    /// of that sum's magnitude.
    pub fn build(
        space: &HilbertSpace,
        group: &SymmetryGroup,
        norm_tol: f64,
    ) -> Result<Self, BasisError> {
        Self::build_with(space, group, &TrivialLocalSymmetry, norm_tol)
    }

    pub fn build_with<L: LocalSymmetry>(
        space: &HilbertSpace,
        group: &SymmetryGroup,
        local: &L,
        norm_tol: f64,
    ) -> Result<Self, BasisError> {
        if group.n_sites() != space.n_sites() {
            return Err(BasisError::PermutationWrongLength {
                len: group.n_sites() as usize,
                n_sites: space.n_sites(),
            });
        }
        let coding = space.coding();
        let mut representatives = Vec::new();
        let mut norms = Vec::new();
        for state in space.iter() {
            let (representative, _) = group.representative_with(local, state, coding);
            if representative != state {
                continue;
            }
            let sum = group.orbit_norm_with(local, state, coding);
            if sum.norm() > norm_tol {
                representatives.push(state);
                norms.push(sum.norm().sqrt());
            }
        }
        Ok(Self {
            representatives,
            norms,
        })
    }

    /// Assemble from parts already computed elsewhere, e.g. marshalled back
    /// across the array boundary.
    pub fn from_parts(representatives: Vec<u64>, norms: Vec<f64>) -> Result<Self, BasisError> {
        if representatives.len() != norms.len() {
            return Err(BasisError::MismatchedNorms {
                representatives: representatives.len(),
                norms: norms.len(),
            });
        }
        Ok(Self {
            representatives,
            norms,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.representatives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.representatives.is_empty()
    }

    #[inline]
    pub fn representatives(&self) -> &[u64] {
        &self.representatives
    }

    #[inline]
    pub fn norms(&self) -> &[f64] {
        &self.norms
    }

    /// Binary-search position of a representative.
    pub fn position(&self, representative: u64) -> Option<usize> {
        self.representatives.binary_search(&representative).ok()
    }
}

#[cfg(test)]
mod tests {
    use approx::abs_diff_eq;

    use super::*;
    use crate::qn::QuantumNumber;
    use crate::space::FamilyTag;

    fn unit(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn spinhalf_space() -> HilbertSpace {
        HilbertSpace::new(FamilyTag::SpinHalf, 4, QuantumNumber::Total(2)).unwrap()
    }

    #[test]
    fn group_validation() {
        let err = SymmetryGroup::new(3, &[vec![0, 1]], vec![unit(1.0)]).unwrap_err();
        assert!(matches!(err, BasisError::PermutationWrongLength { .. }));
        let err = SymmetryGroup::new(3, &[vec![0, 1, 3]], vec![unit(1.0)]).unwrap_err();
        assert!(matches!(err, BasisError::PermutationOutOfRange { .. }));
        let err = SymmetryGroup::new(3, &[vec![0, 1, 1]], vec![unit(1.0)]).unwrap_err();
        assert!(matches!(err, BasisError::PermutationDuplicate { .. }));
        let err = SymmetryGroup::new(3, &[vec![0, 1, 2]], vec![]).unwrap_err();
        assert!(matches!(err, BasisError::MismatchedPhases { .. }));
    }

    #[test]
    fn apply_moves_site_values() {
        let coding = SiteCoding::new(3);
        // swap the two sites of a three-level pair
        let group = SymmetryGroup::new(2, &[vec![1, 0]], vec![unit(1.0)]).unwrap();
        let state = coding.set(coding.set(0, 0, 2), 1, 1);
        let image = group.apply(0, state, coding);
        assert_eq!(coding.get(image, 0), 1);
        assert_eq!(coding.get(image, 1), 2);
    }

    #[test]
    fn representative_idempotence() {
        let space = spinhalf_space();
        let group = SymmetryGroup::cyclic(4, 0);
        let coding = space.coding();
        for state in space.iter() {
            let (representative, _) = group.representative(state, coding);
            let (again, _) = group.representative(representative, coding);
            assert_eq!(again, representative);
            assert!(representative <= state);
        }
    }

    #[test]
    fn representative_phase_maps_state_onto_representative() {
        // The returned phase must belong to the first element in group order
        // that actually maps the input onto the minimum image.
        let space = spinhalf_space();
        let group = SymmetryGroup::cyclic(4, 1);
        let coding = space.coding();
        for state in space.iter() {
            let (representative, phase) = group.representative(state, coding);
            let witness = (0..group.n_elements())
                .find(|&element| group.apply(element, state, coding) == representative)
                .expect("orbit contains its representative");
            assert_eq!(phase, group.phase(witness));
        }
    }

    #[test]
    fn cyclic_zero_momentum_reduction() {
        let space = spinhalf_space();
        let group = SymmetryGroup::cyclic(4, 0);
        let basis = SymmetrizedBasis::build(&space, &group, 1e-6).unwrap();
        assert_eq!(basis.representatives(), &[0b0011, 0b0101]);
        // orbit sizes 4 and 2: stabilizer sums 1 and 2
        assert!(abs_diff_eq!(basis.norms()[0], 1.0, epsilon = 1e-12));
        assert!(abs_diff_eq!(basis.norms()[1], 2f64.sqrt(), epsilon = 1e-12));
        assert_eq!(basis.position(0b0101), Some(1));
        assert_eq!(basis.position(0b0110), None);
    }

    #[test]
    fn momentum_kills_symmetric_orbit() {
        // At momentum 1 the T^2-stabilized orbit of 0101 interferes away.
        let space = spinhalf_space();
        let group = SymmetryGroup::cyclic(4, 1);
        let basis = SymmetrizedBasis::build(&space, &group, 1e-6).unwrap();
        assert_eq!(basis.representatives(), &[0b0011]);
        assert!(abs_diff_eq!(basis.norms()[0], 1.0, epsilon = 1e-12));
    }

    #[test]
    fn destructive_interference_is_null() {
        // Two identity elements with opposite phases annihilate every orbit.
        let space = spinhalf_space();
        let identity: Vec<u32> = (0..4).collect();
        let group = SymmetryGroup::new(
            4,
            &[identity.clone(), identity],
            vec![unit(1.0), unit(-1.0)],
        )
        .unwrap();
        let coding = space.coding();
        assert!(abs_diff_eq!(
            group.orbit_norm(0b0011, coding).norm(),
            0.0,
            epsilon = 1e-12
        ));
        let basis = SymmetrizedBasis::build(&space, &group, 1e-6).unwrap();
        assert!(basis.is_empty());
    }

    #[test]
    fn local_symmetry_extension() {
        // A pure-phase local symmetry halves every norm contribution pair.
        struct SignFlip;
        impl LocalSymmetry for SignFlip {
            fn n_symmetries(&self) -> usize {
                2
            }
            fn apply_symmetry(&self, state: u64, index: usize) -> (u64, Complex64) {
                let phase = if index == 0 { 1.0 } else { -1.0 };
                (state, Complex64::new(phase, 0.0))
            }
        }
        let space = spinhalf_space();
        let group = SymmetryGroup::cyclic(4, 0);
        let basis =
            SymmetrizedBasis::build_with(&space, &group, &SignFlip, 1e-6).unwrap();
        // +1 and -1 phases cancel within every stabilizer
        assert!(basis.is_empty());
    }

    #[test]
    fn mismatched_site_counts_are_rejected() {
        let space = spinhalf_space();
        let group = SymmetryGroup::identity(5);
        assert!(SymmetrizedBasis::build(&space, &group, 1e-6).is_err());
    }
}
