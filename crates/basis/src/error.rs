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

use thiserror::Error;

/// Error cases for basis construction, symmetry reduction and operator
/// assembly.
///
/// Everything here is a contract violation in the sense of the caller having
/// supplied data that cannot describe a basis or an operator; none of these
/// arise from tolerance decisions, which are silent skips accounted for only
/// in the size of the output.
#[derive(Error, Debug)]
pub enum BasisError {
    #[error("quantum number {quantum_number} is not a valid sector of a {n_sites}-site {family} space")]
    InvalidQuantumNumber {
        family: &'static str,
        n_sites: u32,
        quantum_number: String,
    },
    #[error("{n_sites} sites at {n_bits} bits per site do not fit the 64-bit state word")]
    TooManySites { n_sites: u32, n_bits: u32 },
    #[error("permutation of length {len} cannot act on {n_sites} sites")]
    PermutationWrongLength { len: usize, n_sites: u32 },
    #[error("invalid permutation: input has length {len} and contains {value}")]
    PermutationOutOfRange { len: usize, value: u32 },
    #[error("invalid permutation: input contains {value} more than once")]
    PermutationDuplicate { value: u32 },
    #[error("{n_permutations} permutations paired with {n_phases} phases")]
    MismatchedPhases {
        n_permutations: usize,
        n_phases: usize,
    },
    #[error("state {state:#x} reached by a bond is not in the basis; bonds must preserve the quantum-number sector")]
    RepresentativeNotFound { state: u64 },
    #[error("bond site {site} is out of range for {n_sites} sites")]
    BondSiteOutOfRange { site: u32, n_sites: u32 },
    #[error("bond on {n_bond_sites} sites requires a {expected}x{expected} matrix, got {rows}x{cols}")]
    BondMatrixShape {
        n_bond_sites: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{representatives} representatives paired with {norms} norms")]
    MismatchedNorms {
        representatives: usize,
        norms: usize,
    },
    #[error("`rows` ({rows}), `cols` ({cols}) and `values` ({values}) must be the same length")]
    MismatchedTripletArrays {
        rows: usize,
        cols: usize,
        values: usize,
    },
    #[error("'{0}' is not a recognized Hilbert-space family")]
    UnknownFamily(String),
}
