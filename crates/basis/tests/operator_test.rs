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

//! End-to-end operator assembly properties over raw and symmetry-reduced
//! bases.

use hashbrown::HashMap;
use ndarray::{array, Array2};
use num_complex::Complex64;

use manybody_basis::{
    get_basis_states, get_basis_states_symmetrized, get_operator, get_operator_symmetrized,
    AssemblyPolicy, Bond, FamilyTag, QuantumNumber, SparseTriplets, SymmetryGroup, SITE_SENTINEL,
};

fn c(re: f64) -> Complex64 {
    Complex64::new(re, 0.0)
}

/// Spin-1/2 exchange bond in the two-site product basis.
fn heisenberg_matrix() -> Array2<Complex64> {
    array![
        [c(0.25), c(0.0), c(0.0), c(0.0)],
        [c(0.0), c(-0.25), c(0.5), c(0.0)],
        [c(0.0), c(0.5), c(-0.25), c(0.0)],
        [c(0.0), c(0.0), c(0.0), c(0.25)],
    ]
}

fn ring_bonds(n_sites: u32, matrix: &Array2<Complex64>) -> Vec<Bond> {
    (0..n_sites)
        .map(|site| Bond::new([site, (site + 1) % n_sites], matrix.clone()))
        .collect()
}

/// Coalesce triplets for comparisons; assembly itself leaves duplicates.
fn accumulate(triplets: &SparseTriplets) -> HashMap<(u64, u64), Complex64> {
    let mut matrix = HashMap::new();
    for (row, col, value) in triplets.iter() {
        *matrix.entry((row, col)).or_insert_with(|| c(0.0)) += value;
    }
    matrix
}

fn assert_hermitian(matrix: &HashMap<(u64, u64), Complex64>) {
    for (&(row, col), &value) in matrix {
        let transposed = matrix.get(&(col, row)).copied().unwrap_or_else(|| c(0.0));
        assert!(
            (value - transposed.conj()).norm() < 1e-12,
            "element ({row}, {col}) breaks hermiticity: {value} vs {transposed}",
        );
    }
}

#[test]
fn hermitian_bond_gives_hermitian_operator() {
    let basis = get_basis_states(FamilyTag::SpinHalf, 4, &QuantumNumber::Total(2)).unwrap();
    let bonds = ring_bonds(4, &heisenberg_matrix());
    let triplets = get_operator(
        FamilyTag::SpinHalf,
        4,
        &basis,
        &bonds,
        &AssemblyPolicy::default(),
    )
    .unwrap();
    assert_hermitian(&accumulate(&triplets));
}

#[test]
fn momentum_sectors_are_hermitian_and_preserve_the_trace() {
    let tag = FamilyTag::SpinHalf;
    let sector = QuantumNumber::Total(2);
    let policy = AssemblyPolicy::default();
    let bonds = ring_bonds(4, &heisenberg_matrix());

    let basis = get_basis_states(tag, 4, &sector).unwrap();
    let raw = get_operator(tag, 4, &basis, &bonds, &policy).unwrap();
    let raw_trace: Complex64 = raw
        .iter()
        .filter(|(row, col, _)| row == col)
        .map(|(_, _, value)| value)
        .sum();

    let mut reduced_dimensions = 0usize;
    let mut reduced_trace = c(0.0);
    for momentum in 0..4 {
        let group = SymmetryGroup::cyclic(4, momentum);
        let reduced = get_basis_states_symmetrized(tag, 4, &sector, &group, &policy).unwrap();
        reduced_dimensions += reduced.len();
        let triplets =
            get_operator_symmetrized(tag, 4, &reduced, &group, &bonds, &policy).unwrap();
        assert_hermitian(&accumulate(&triplets));
        reduced_trace += triplets
            .iter()
            .filter(|(row, col, _)| row == col)
            .map(|(_, _, value)| value)
            .sum::<Complex64>();
    }

    // the momentum decomposition covers the sector exactly once
    assert_eq!(reduced_dimensions as u64, 6);
    assert!((raw_trace - reduced_trace).norm() < 1e-12);
}

#[test]
fn three_color_exchange_is_hermitian() {
    // Permutation bond P|ab> = |ba> on three-color sites.
    let mut exchange = Array2::zeros((9, 9));
    for a in 0..3usize {
        for b in 0..3usize {
            exchange[[3 * a + b, 3 * b + a]] = c(1.0);
        }
    }
    let tag = FamilyTag::Sun { n_colors: 3 };
    let sector = QuantumNumber::per_color([2, 1, 1]);
    let basis = get_basis_states(tag, 4, &sector).unwrap();
    assert_eq!(basis.len(), 12);
    let bonds = ring_bonds(4, &exchange);
    let triplets =
        get_operator(tag, 4, &basis, &bonds, &AssemblyPolicy::default()).unwrap();
    assert_hermitian(&accumulate(&triplets));
    // exchange never leaves the color sector, and every state sees all bonds
    assert!(triplets.len() >= basis.len() * bonds.len());
}

#[test]
fn spin_one_ising_bond_is_diagonal() {
    // S^z_i S^z_j on three-level sites: diagonal in the digit basis.
    let mut ising = Array2::zeros((9, 9));
    for a in 0..3usize {
        for b in 0..3usize {
            let index = 3 * a + b;
            ising[[index, index]] = c((a as f64 - 1.0) * (b as f64 - 1.0));
        }
    }
    let tag = FamilyTag::BoundedSpin { local_dim: 3 };
    let sector = QuantumNumber::Total(4);
    let basis = get_basis_states(tag, 4, &sector).unwrap();
    let bonds = ring_bonds(4, &ising);
    let triplets =
        get_operator(tag, 4, &basis, &bonds, &AssemblyPolicy::default()).unwrap();
    assert!(triplets.iter().all(|(row, col, _)| row == col));
}

#[test]
fn sentinel_terminated_bonds_through_the_boundary() {
    let raw_sites = [0u32, 1, SITE_SENTINEL, SITE_SENTINEL];
    let bond = Bond::from_sentinel_sites(&raw_sites, heisenberg_matrix());
    assert_eq!(bond.sites(), &[0, 1]);
    let basis = get_basis_states(FamilyTag::SpinHalf, 2, &QuantumNumber::Total(1)).unwrap();
    let triplets = get_operator(
        FamilyTag::SpinHalf,
        2,
        &basis,
        &[bond],
        &AssemblyPolicy::default(),
    )
    .unwrap();
    let matrix = accumulate(&triplets);
    assert_eq!(matrix[&(0, 1)], c(0.5));
    assert_eq!(matrix[&(0, 0)], c(-0.25));
}
