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

//! Assembly of sparse global operators from local bond matrices.
//!
//! A bond couples a small tuple of sites through a dense matrix indexed by
//! the mixed-radix encoding of the tuple's local values.  Assembly walks the
//! sorted basis, scatters each above-tolerance matrix element to the basis
//! position of the state it produces, and emits `(row, column, value)`
//! triplets in per-bond, per-state order.  Duplicate positions are not
//! coalesced here; accumulation is the consumer's concern.
//!
//! The outer loop over basis states is embarrassingly parallel: states are
//! partitioned into chunks, every chunk fills a private triplet buffer
//! against the read-only basis and symmetry tables, and the buffers are
//! concatenated in order afterwards.

use ndarray::Array2;
use num_complex::Complex64;
use rayon::prelude::*;
use smallvec::SmallVec;

use crate::error::BasisError;
use crate::getenv_use_multiple_threads;
use crate::packing::SiteCoding;
use crate::symmetry::{LocalSymmetry, SymmetrizedBasis, SymmetryGroup, TrivialLocalSymmetry};

/// Marker terminating a bond-site list at the flat array boundary.
pub const SITE_SENTINEL: u32 = u32::MAX;

/// Basis sizes below this are never worth the fork-join overhead.
const PARALLEL_THRESHOLD: usize = 1 << 12;

/// States scanned per private triplet buffer.
const CHUNK_SIZE: usize = 1 << 10;

/// Tolerance policy for assembly and symmetrization.
///
/// These are policy constants rather than error conditions: elements and
/// orbit norms at or below the tolerance are skipped silently, visible only
/// in the size of the output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AssemblyPolicy {
    /// Bond matrix elements with magnitude at or below this are dropped.
    pub element_tol: f64,
    /// Orbit-norm magnitudes at or below this mark a null representative.
    pub norm_tol: f64,
}

impl Default for AssemblyPolicy {
    fn default() -> Self {
        Self {
            element_tol: 1e-12,
            norm_tol: 1e-6,
        }
    }
}

/// A local operator on a fixed tuple of sites.
///
/// The matrix has `local_dim ^ sites.len()` rows and columns; the first
/// listed site is the most significant digit of the row/column index.
#[derive(Clone, Debug, PartialEq)]
pub struct Bond {
    sites: SmallVec<[u32; 4]>,
    matrix: Array2<Complex64>,
}

impl Bond {
    pub fn new(sites: impl IntoIterator<Item = u32>, matrix: Array2<Complex64>) -> Self {
        Self {
            sites: sites.into_iter().collect(),
            matrix,
        }
    }

    /// Read a site tuple terminated by [SITE_SENTINEL], the convention of
    /// the flat array-exchange boundary.
    pub fn from_sentinel_sites(raw_sites: &[u32], matrix: Array2<Complex64>) -> Self {
        Self::new(
            raw_sites.iter().copied().take_while(|&site| site != SITE_SENTINEL),
            matrix,
        )
    }

    #[inline]
    pub fn sites(&self) -> &[u32] {
        &self.sites
    }

    #[inline]
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Check the tuple against the lattice and the matrix against the tuple.
    fn validate(&self, coding: SiteCoding, n_sites: u32) -> Result<(), BasisError> {
        for &site in &self.sites {
            if site >= n_sites {
                return Err(BasisError::BondSiteOutOfRange { site, n_sites });
            }
        }
        let expected = (coding.local_dim() as usize).pow(self.sites.len() as u32);
        let (rows, cols) = self.matrix.dim();
        if rows != expected || cols != expected {
            return Err(BasisError::BondMatrixShape {
                n_bond_sites: self.sites.len(),
                expected,
                rows,
                cols,
            });
        }
        Ok(())
    }

    /// Mixed-radix configuration index of the tuple's values in `state`.
    #[inline]
    fn local_index(&self, coding: SiteCoding, state: u64) -> usize {
        self.sites.iter().fold(0usize, |index, &site| {
            index * coding.local_dim() as usize + coding.get(state, site) as usize
        })
    }

    /// `state` with the tuple's values replaced by the decoded configuration.
    #[inline]
    fn apply_configuration(&self, coding: SiteCoding, state: u64, mut index: usize) -> u64 {
        let local_dim = coding.local_dim() as usize;
        let mut out = state;
        for &site in self.sites.iter().rev() {
            out = coding.set(out, site, (index % local_dim) as u64);
            index /= local_dim;
        }
        out
    }
}

/// The assembled sparse operator: one `(row, column, value)` triplet per
/// discovered matrix element, stored as three equal-length flat arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SparseTriplets {
    rows: Vec<u64>,
    cols: Vec<u64>,
    values: Vec<Complex64>,
}

impl SparseTriplets {
    /// Rebuild from raw parts, checking the arrays agree in length.
    pub fn from_parts(
        rows: Vec<u64>,
        cols: Vec<u64>,
        values: Vec<Complex64>,
    ) -> Result<Self, BasisError> {
        if rows.len() != cols.len() || rows.len() != values.len() {
            return Err(BasisError::MismatchedTripletArrays {
                rows: rows.len(),
                cols: cols.len(),
                values: values.len(),
            });
        }
        Ok(Self { rows, cols, values })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[inline]
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    #[inline]
    pub fn cols(&self) -> &[u64] {
        &self.cols
    }

    #[inline]
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, Complex64)> + '_ {
        itertools::izip!(&self.rows, &self.cols, &self.values)
            .map(|(&row, &col, &value)| (row, col, value))
    }

    /// Surrender the three flat arrays to the caller.
    pub fn into_parts(self) -> (Vec<u64>, Vec<u64>, Vec<Complex64>) {
        (self.rows, self.cols, self.values)
    }

    fn push(&mut self, row: u64, col: u64, value: Complex64) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    fn append(&mut self, mut other: SparseTriplets) {
        self.rows.append(&mut other.rows);
        self.cols.append(&mut other.cols);
        self.values.append(&mut other.values);
    }
}

/// Assemble the bonds over a raw sorted basis.
///
/// Every off-diagonal target must itself be a basis state: a miss means the
/// bond leaves the quantum-number sector and fails the whole assembly.
pub fn assemble(
    coding: SiteCoding,
    n_sites: u32,
    basis: &[u64],
    bonds: &[Bond],
    policy: &AssemblyPolicy,
) -> Result<SparseTriplets, BasisError> {
    assemble_inner(coding, n_sites, basis, bonds, policy, use_threads(basis.len()))
}

/// Assemble the bonds over a symmetry-reduced basis.
///
/// Off-diagonal targets are folded onto their orbit representative; a
/// representative missing from the kept set was excluded as null and its
/// contribution is skipped, not an error.
pub fn assemble_symmetrized(
    coding: SiteCoding,
    n_sites: u32,
    basis: &SymmetrizedBasis,
    group: &SymmetryGroup,
    bonds: &[Bond],
    policy: &AssemblyPolicy,
) -> Result<SparseTriplets, BasisError> {
    assemble_symmetrized_with(coding, n_sites, basis, group, &TrivialLocalSymmetry, bonds, policy)
}

/// [assemble_symmetrized] with an extra local-symmetry source.
pub fn assemble_symmetrized_with<L: LocalSymmetry + Sync>(
    coding: SiteCoding,
    n_sites: u32,
    basis: &SymmetrizedBasis,
    group: &SymmetryGroup,
    local: &L,
    bonds: &[Bond],
    policy: &AssemblyPolicy,
) -> Result<SparseTriplets, BasisError> {
    assemble_symmetrized_inner(
        coding,
        n_sites,
        basis,
        group,
        local,
        bonds,
        policy,
        use_threads(basis.len()),
    )
}

fn use_threads(n_states: usize) -> bool {
    n_states >= PARALLEL_THRESHOLD && getenv_use_multiple_threads()
}

fn assemble_inner(
    coding: SiteCoding,
    n_sites: u32,
    basis: &[u64],
    bonds: &[Bond],
    policy: &AssemblyPolicy,
    parallel: bool,
) -> Result<SparseTriplets, BasisError> {
    for bond in bonds {
        bond.validate(coding, n_sites)?;
    }
    let mut out = SparseTriplets::default();
    for bond in bonds {
        let scan = |(chunk_index, chunk): (usize, &[u64])| {
            raw_chunk(coding, basis, bond, policy, chunk_index * CHUNK_SIZE, chunk)
        };
        let buffers: Result<Vec<_>, BasisError> = if parallel {
            basis.par_chunks(CHUNK_SIZE).enumerate().map(scan).collect()
        } else {
            basis.chunks(CHUNK_SIZE).enumerate().map(scan).collect()
        };
        for buffer in buffers? {
            out.append(buffer);
        }
    }
    Ok(out)
}

fn raw_chunk(
    coding: SiteCoding,
    basis: &[u64],
    bond: &Bond,
    policy: &AssemblyPolicy,
    base: usize,
    chunk: &[u64],
) -> Result<SparseTriplets, BasisError> {
    let mut triplets = SparseTriplets::default();
    for (offset, &state) in chunk.iter().enumerate() {
        let row = (base + offset) as u64;
        let index = bond.local_index(coding, state);
        for (column, &element) in bond.matrix.row(index).iter().enumerate() {
            if element.norm() <= policy.element_tol {
                continue;
            }
            if column == index {
                triplets.push(row, row, element);
                continue;
            }
            let target = bond.apply_configuration(coding, state, column);
            match basis.binary_search(&target) {
                Ok(position) => triplets.push(row, position as u64, element),
                Err(_) => return Err(BasisError::RepresentativeNotFound { state: target }),
            }
        }
    }
    Ok(triplets)
}

fn assemble_symmetrized_inner<L: LocalSymmetry + Sync>(
    coding: SiteCoding,
    n_sites: u32,
    basis: &SymmetrizedBasis,
    group: &SymmetryGroup,
    local: &L,
    bonds: &[Bond],
    policy: &AssemblyPolicy,
    parallel: bool,
) -> Result<SparseTriplets, BasisError> {
    if group.n_sites() != n_sites {
        return Err(BasisError::PermutationWrongLength {
            len: group.n_sites() as usize,
            n_sites,
        });
    }
    for bond in bonds {
        bond.validate(coding, n_sites)?;
    }
    let representatives = basis.representatives();
    let mut out = SparseTriplets::default();
    for bond in bonds {
        let scan = |(chunk_index, chunk): (usize, &[u64])| {
            symmetrized_chunk(
                coding,
                basis,
                group,
                local,
                bond,
                policy,
                chunk_index * CHUNK_SIZE,
                chunk,
            )
        };
        let buffers: Vec<_> = if parallel {
            representatives
                .par_chunks(CHUNK_SIZE)
                .enumerate()
                .map(scan)
                .collect()
        } else {
            representatives.chunks(CHUNK_SIZE).enumerate().map(scan).collect()
        };
        for buffer in buffers {
            out.append(buffer);
        }
    }
    Ok(out)
}

fn symmetrized_chunk<L: LocalSymmetry>(
    coding: SiteCoding,
    basis: &SymmetrizedBasis,
    group: &SymmetryGroup,
    local: &L,
    bond: &Bond,
    policy: &AssemblyPolicy,
    base: usize,
    chunk: &[u64],
) -> SparseTriplets {
    let norms = basis.norms();
    let mut triplets = SparseTriplets::default();
    for (offset, &state) in chunk.iter().enumerate() {
        let row = base + offset;
        let index = bond.local_index(coding, state);
        for (column, &element) in bond.matrix.row(index).iter().enumerate() {
            if element.norm() <= policy.element_tol {
                continue;
            }
            if column == index {
                triplets.push(row as u64, row as u64, element);
                continue;
            }
            let target = bond.apply_configuration(coding, state, column);
            let (representative, phase) = group.representative_with(local, target, coding);
            // a missing representative was excluded as null: skip, not error
            if let Some(position) = basis.position(representative) {
                let value = element * phase * (norms[position] / norms[row]);
                triplets.push(row as u64, position as u64, value);
            }
        }
    }
    triplets
}
