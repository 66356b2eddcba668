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

//! The per-family entry points exposed at the array-exchange boundary.
//!
//! Families are selected by [FamilyTag] (or its string form via `FromStr`);
//! every output is an owned contiguous collection, sized exactly to what was
//! discovered.

use crate::error::BasisError;
use crate::hilbert::HilbertSpace;
use crate::operator::{self, AssemblyPolicy, Bond, SparseTriplets};
use crate::qn::QuantumNumber;
use crate::space::{FamilyTag, StateFamily};
use crate::symmetry::{SymmetrizedBasis, SymmetryGroup};

/// Dimension of the quantum-number-restricted space.
pub fn raw_dimension(
    tag: FamilyTag,
    n_sites: u32,
    sector: &QuantumNumber,
) -> Result<u64, BasisError> {
    HilbertSpace::new(tag, n_sites, sector.clone()).map(|space| space.dimension())
}

/// The sorted packed states of one sector.
pub fn get_basis_states(
    tag: FamilyTag,
    n_sites: u32,
    sector: &QuantumNumber,
) -> Result<Vec<u64>, BasisError> {
    HilbertSpace::new(tag, n_sites, sector.clone()).map(|space| space.states())
}

/// The sorted non-null orbit representatives of one sector with their norms.
pub fn get_basis_states_symmetrized(
    tag: FamilyTag,
    n_sites: u32,
    sector: &QuantumNumber,
    group: &SymmetryGroup,
    policy: &AssemblyPolicy,
) -> Result<SymmetrizedBasis, BasisError> {
    let space = HilbertSpace::new(tag, n_sites, sector.clone())?;
    SymmetrizedBasis::build(&space, group, policy.norm_tol)
}

/// Sparse triplets of the bond operators over a raw sorted basis.
pub fn get_operator(
    tag: FamilyTag,
    n_sites: u32,
    basis: &[u64],
    bonds: &[Bond],
    policy: &AssemblyPolicy,
) -> Result<SparseTriplets, BasisError> {
    operator::assemble(tag.coding(), n_sites, basis, bonds, policy)
}

/// Sparse triplets of the bond operators over a symmetry-reduced basis.
pub fn get_operator_symmetrized(
    tag: FamilyTag,
    n_sites: u32,
    basis: &SymmetrizedBasis,
    group: &SymmetryGroup,
    bonds: &[Bond],
    policy: &AssemblyPolicy,
) -> Result<SparseTriplets, BasisError> {
    operator::assemble_symmetrized(tag.coding(), n_sites, basis, group, bonds, policy)
}

/// Printable per-site digit string, most significant site first.
pub fn state_to_string(tag: FamilyTag, state: u64, n_sites: u32) -> String {
    let coding = tag.coding();
    (0..n_sites)
        .rev()
        .map(|site| (b'0' + coding.get(state, site) as u8) as char)
        .collect()
}
