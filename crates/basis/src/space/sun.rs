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

//! N-color sites with conserved per-color populations.
//!
//! A sector fixes the multiset of colors over the lattice, so every state in
//! it packs to a word with the same total popcount.  The successor rides the
//! fixed-popcount bit-pattern walk over the packed word and accepts only
//! words that are field-valid and reproduce the sector populations above the
//! distinguished minimum color (color 0 is then fixed by the site count).
//! Iteration terminates exactly at the largest arrangement; there is no loose
//! sentinel beyond it.

use smallvec::SmallVec;

use crate::combinatorics::{multinomial, next_bit_pattern};
use crate::error::BasisError;
use crate::packing::SiteCoding;
use crate::qn::QuantumNumber;
use crate::space::StateFamily;

/// Arrangements of the multiset after consuming one of `count` equal items
/// out of `total`: `arrangements * count / total`, exact by construction.
///
/// The widening multiply keeps the transient product in range whenever the
/// arrangement counts themselves fit a `u64`.
#[inline]
fn shrink(arrangements: u64, count: u64, total: u64) -> u64 {
    (u128::from(arrangements) * u128::from(count) / u128::from(total)) as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Sun {
    n_colors: u8,
}

impl Sun {
    pub fn new(n_colors: u8) -> Self {
        debug_assert!((2..=8).contains(&n_colors));
        Self { n_colors }
    }

    fn sector_counts(sector: &QuantumNumber) -> &[u64] {
        match sector {
            QuantumNumber::PerColor(counts) => counts,
            _ => unreachable!("sector is validated before use"),
        }
    }

    fn color_counts(&self, state: u64, n_sites: u32, coding: SiteCoding) -> SmallVec<[u64; 8]> {
        let mut counts: SmallVec<[u64; 8]> = SmallVec::from_elem(0, self.n_colors as usize);
        for site in 0..n_sites {
            counts[coding.get(state, site) as usize] += 1;
        }
        counts
    }

    /// Sector membership of a candidate word from the popcount walk.
    ///
    /// Populations are only compared above color 0: with every field valid,
    /// the minimum color's population is fixed by the site count.
    fn accepts(&self, candidate: u64, n_sites: u32, sector: &QuantumNumber) -> bool {
        let coding = self.coding();
        if !coding.is_valid_state(candidate, n_sites) {
            return false;
        }
        let counts = self.color_counts(candidate, n_sites, coding);
        counts[1..] == Self::sector_counts(sector)[1..]
    }
}

impl StateFamily for Sun {
    fn local_dim(&self) -> u64 {
        u64::from(self.n_colors)
    }

    fn name(&self) -> &'static str {
        match self.n_colors {
            2 => "u2",
            3 => "u3",
            4 => "u4",
            5 => "u5",
            6 => "u6",
            7 => "u7",
            8 => "u8",
            _ => unreachable!("color count is within the closed family set"),
        }
    }

    fn quantum_number(&self, state: u64, n_sites: u32) -> QuantumNumber {
        QuantumNumber::PerColor(self.color_counts(state, n_sites, self.coding()))
    }

    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError> {
        match sector {
            QuantumNumber::PerColor(counts)
                if counts.len() == self.n_colors as usize
                    && counts.iter().sum::<u64>() == u64::from(n_sites) =>
            {
                Ok(())
            }
            _ => Err(BasisError::InvalidQuantumNumber {
                family: self.name(),
                n_sites,
                quantum_number: sector.to_string(),
            }),
        }
    }

    fn dimension(&self, n_sites: u32, sector: &QuantumNumber) -> u64 {
        multinomial(u64::from(n_sites), Self::sector_counts(sector))
    }

    fn first(&self, _n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        // Colors descending from site 0 upward: the smallest packed word.
        let coding = self.coding();
        let counts = Self::sector_counts(sector);
        let mut state = 0u64;
        let mut site = 0u32;
        for color in (0..self.n_colors as usize).rev() {
            for _ in 0..counts[color] {
                state = coding.set(state, site, color as u64);
                site += 1;
            }
        }
        Some(state)
    }

    fn last(&self, _n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        // Colors ascending from site 0 upward: the largest packed word.
        let coding = self.coding();
        let counts = Self::sector_counts(sector);
        let mut state = 0u64;
        let mut site = 0u32;
        for color in 0..self.n_colors as usize {
            for _ in 0..counts[color] {
                state = coding.set(state, site, color as u64);
                site += 1;
            }
        }
        Some(state)
    }

    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        if Some(state) == self.last(n_sites, sector) {
            return None;
        }
        // The walk visits every word of equal popcount in ascending order;
        // the accepted superset member below `last` always exists.
        let mut candidate = state;
        loop {
            candidate = next_bit_pattern(candidate);
            if self.accepts(candidate, n_sites, sector) {
                return Some(candidate);
            }
        }
    }

    fn rank(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        let coding = self.coding();
        let mut counts: SmallVec<[u64; 8]> = SmallVec::from_slice(Self::sector_counts(sector));
        let mut remaining = u64::from(n_sites);
        let mut arrangements = multinomial(remaining, &counts);
        let mut rank = 0u64;
        for site in (0..n_sites).rev() {
            let value = coding.get(state, site) as usize;
            for color in 0..value {
                if counts[color] > 0 {
                    // completions that put the smaller color at this site
                    rank += shrink(arrangements, counts[color], remaining);
                }
            }
            arrangements = shrink(arrangements, counts[value], remaining);
            counts[value] -= 1;
            remaining -= 1;
        }
        rank
    }

    fn unrank(&self, mut rank: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        let coding = self.coding();
        let mut counts: SmallVec<[u64; 8]> = SmallVec::from_slice(Self::sector_counts(sector));
        let mut remaining = u64::from(n_sites);
        let mut arrangements = multinomial(remaining, &counts);
        let mut state = 0u64;
        for site in (0..n_sites).rev() {
            let mut chosen = self.n_colors as usize;
            for color in 0..self.n_colors as usize {
                if counts[color] == 0 {
                    continue;
                }
                let block = shrink(arrangements, counts[color], remaining);
                if rank < block {
                    chosen = color;
                    break;
                }
                rank -= block;
            }
            debug_assert!(chosen < self.n_colors as usize, "rank out of range");
            state = coding.set(state, site, chosen as u64);
            arrangements = shrink(arrangements, counts[chosen], remaining);
            counts[chosen] -= 1;
            remaining -= 1;
        }
        state
    }
}
