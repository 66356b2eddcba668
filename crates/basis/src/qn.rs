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

//! Conserved-quantity value types used to select one enumeration sector.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Add;

use smallvec::SmallVec;

use crate::combinatorics::{binomial, rank_multiset, unrank_multiset};

/// A conserved quantum number restricting enumeration to one sector.
///
/// Scalar totals cover the two-level up-spin count and the bounded-digit
/// magnetization sum; per-color vectors cover the N-color populations, whose
/// entries always sum to the site count.  Values are compared and combined by
/// value and never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QuantumNumber {
    /// Scalar conserved total.
    Total(u64),
    /// Per-color populations of an N-color space.
    PerColor(SmallVec<[u64; 8]>),
    /// No conserved quantity; the full space.
    Unrestricted,
}

impl QuantumNumber {
    /// Per-color constructor from any count sequence.
    pub fn per_color(counts: impl IntoIterator<Item = u64>) -> Self {
        Self::PerColor(counts.into_iter().collect())
    }

    /// Balanced filling of a scalar-total family: half the maximal
    /// magnetization `(local_dim - 1) * n_sites`, rounded down.
    pub fn balanced_total(local_dim: u64, n_sites: u32) -> Self {
        Self::Total((local_dim - 1) * u64::from(n_sites) / 2)
    }

    /// Balanced per-color filling: sites distributed as evenly as the color
    /// count allows, the remainder going to the lowest colors.
    pub fn balanced_per_color(n_colors: u32, n_sites: u32) -> Self {
        let base = u64::from(n_sites / n_colors);
        let extra = n_sites % n_colors;
        Self::PerColor(
            (0..n_colors)
                .map(|color| base + u64::from(color < extra))
                .collect(),
        )
    }

    /// Same-kind addition without panicking; `None` when the kinds or color
    /// counts differ.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        match (self, other) {
            (Self::Total(left), Self::Total(right)) => Some(Self::Total(left + right)),
            (Self::PerColor(left), Self::PerColor(right)) if left.len() == right.len() => {
                Some(Self::PerColor(
                    left.iter().zip(right).map(|(a, b)| a + b).collect(),
                ))
            }
            (Self::Unrestricted, Self::Unrestricted) => Some(Self::Unrestricted),
            _ => None,
        }
    }
}

impl Add for &QuantumNumber {
    type Output = QuantumNumber;

    /// Combine two sectors of the same kind.
    ///
    /// # Panics
    ///
    /// If the operands are of different kinds or different color counts.
    fn add(self, other: &QuantumNumber) -> QuantumNumber {
        self.checked_add(other)
            .expect("quantum numbers of different kinds cannot be combined")
    }
}

impl PartialOrd for QuantumNumber {
    /// Component-wise partial order; values of different kinds (or different
    /// color counts) are incomparable.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Total(left), Self::Total(right)) => left.partial_cmp(right),
            (Self::PerColor(left), Self::PerColor(right)) if left.len() == right.len() => {
                let mut order = Ordering::Equal;
                for (a, b) in left.iter().zip(right) {
                    match (order, a.cmp(b)) {
                        (_, Ordering::Equal) => {}
                        (Ordering::Equal, component) => order = component,
                        (current, component) if current == component => {}
                        _ => return None,
                    }
                }
                Some(order)
            }
            (Self::Unrestricted, Self::Unrestricted) => Some(Ordering::Equal),
            _ => None,
        }
    }
}

impl fmt::Display for QuantumNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Total(total) => write!(f, "{total}"),
            Self::PerColor(counts) => {
                write!(f, "[")?;
                for (i, count) in counts.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{count}")?;
                }
                write!(f, "]")
            }
            Self::Unrestricted => write!(f, "*"),
        }
    }
}

/// All scalar-total sectors of a bounded-digit family, ascending.
pub fn scalar_sectors(local_dim: u64, n_sites: u32) -> impl Iterator<Item = QuantumNumber> {
    (0..=(local_dim - 1) * u64::from(n_sites)).map(QuantumNumber::Total)
}

/// All per-color sectors of an N-color family, in stars-and-bars rank order.
pub fn per_color_sectors(
    n_colors: u32,
    n_sites: u32,
) -> impl Iterator<Item = QuantumNumber> {
    let n_sectors = binomial(
        u64::from(n_colors + n_sites - 1),
        i64::from(n_sites),
    );
    (0..n_sectors).map(move |rank| {
        QuantumNumber::PerColor(unrank_multiset(n_colors, n_sites, rank).into_iter().collect())
    })
}

/// Stars-and-bars rank of a per-color sector, the inverse of the order
/// produced by [per_color_sectors].
pub fn per_color_sector_rank(counts: &[u64]) -> u64 {
    rank_multiset(counts)
}
