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

//! Basis enumeration, symmetry reduction and sparse operator assembly for
//! many-body Hilbert spaces with up to 64 bits of packed state.
//!
//! A [HilbertSpace] names a local-site family, a site count and a conserved
//! quantum-number sector; it enumerates the sector's packed basis states in
//! ascending order and indexes them through exact rank/unrank bijections.  A
//! [SymmetryGroup] of phased site permutations reduces a sector to its
//! non-null orbit representatives, and [operator] scatters dense bond
//! matrices over either kind of basis into sparse `(row, column, value)`
//! triplets.

use std::env;

pub mod combinatorics;
pub mod error;
pub mod hilbert;
pub mod operator;
pub mod packing;
pub mod qn;
pub mod space;
pub mod symmetry;

mod api;

pub use api::{
    get_basis_states, get_basis_states_symmetrized, get_operator, get_operator_symmetrized,
    raw_dimension, state_to_string,
};
pub use error::BasisError;
pub use hilbert::{HilbertSpace, States};
pub use operator::{AssemblyPolicy, Bond, SparseTriplets, SITE_SENTINEL};
pub use packing::SiteCoding;
pub use qn::QuantumNumber;
pub use space::{BoundedSpin, Digits, FamilyTag, SpinHalf, StateFamily, Sun};
pub use symmetry::{LocalSymmetry, SymmetrizedBasis, SymmetryGroup, TrivialLocalSymmetry};

#[inline]
pub fn getenv_use_multiple_threads() -> bool {
    let parallel_context = env::var("MANYBODY_IN_PARALLEL")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    let force_threads = env::var("MANYBODY_FORCE_THREADS")
        .unwrap_or_else(|_| "FALSE".to_string())
        .to_uppercase()
        == "TRUE";
    !parallel_context || force_threads
}
