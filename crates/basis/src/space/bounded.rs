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

//! Bounded-digit sites with a conserved magnetization total.
//!
//! The generic higher-spin family: local dimension 3 to 8, quantum number
//! the sum of all site digits.  There is no closed-form successor for a
//! fixed digit sum, so `advance` walks the dense mixed-radix counter and
//! re-validates the total on each step — the slow path of the family set.
//! Rank/unrank run the digit DP over memoized bounded-partition counts.

use crate::combinatorics::PartitionCounter;
use crate::error::BasisError;
use crate::qn::QuantumNumber;
use crate::space::StateFamily;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedSpin {
    local_dim: u8,
}

impl BoundedSpin {
    pub fn new(local_dim: u8) -> Self {
        debug_assert!((3..=8).contains(&local_dim));
        Self { local_dim }
    }

    fn total(sector: &QuantumNumber) -> u64 {
        match sector {
            QuantumNumber::Total(total) => *total,
            _ => unreachable!("sector is validated before use"),
        }
    }

    fn digit_sum(&self, state: u64, n_sites: u32) -> u64 {
        let coding = self.coding();
        (0..n_sites).map(|site| coding.get(state, site)).sum()
    }
}

impl StateFamily for BoundedSpin {
    fn local_dim(&self) -> u64 {
        u64::from(self.local_dim)
    }

    fn name(&self) -> &'static str {
        // d = 2S + 1
        match self.local_dim {
            3 => "spinone",
            4 => "spin3half",
            5 => "spintwo",
            6 => "spin5half",
            7 => "spinthree",
            8 => "spin7half",
            _ => unreachable!("local dimension is within the closed family set"),
        }
    }

    fn quantum_number(&self, state: u64, n_sites: u32) -> QuantumNumber {
        QuantumNumber::Total(self.digit_sum(state, n_sites))
    }

    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError> {
        match sector {
            QuantumNumber::Total(total)
                if *total <= (self.local_dim() - 1) * u64::from(n_sites) =>
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
        PartitionCounter::new(self.local_dim()).count(Self::total(sector), n_sites)
    }

    fn first(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        // Maximal digits at the lowest-index sites: the smallest packed word.
        let coding = self.coding();
        let mut remaining = Self::total(sector);
        let mut state = 0u64;
        for site in 0..n_sites {
            let digit = remaining.min(self.local_dim() - 1);
            state = coding.set(state, site, digit);
            remaining -= digit;
        }
        Some(state)
    }

    fn last(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        // Maximal digits at the highest-index sites: the largest packed word.
        let coding = self.coding();
        let mut remaining = Self::total(sector);
        let mut state = 0u64;
        for site in (0..n_sites).rev() {
            let digit = remaining.min(self.local_dim() - 1);
            state = coding.set(state, site, digit);
            remaining -= digit;
        }
        Some(state)
    }

    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        if Some(state) == self.last(n_sites, sector) {
            return None;
        }
        let coding = self.coding();
        let total = Self::total(sector);
        // Accept/reject over the dense counter; packed and compressed order
        // agree, so this lands on `last` before running off the range.
        let mut cursor = coding.compress(state, n_sites) + 1;
        loop {
            let candidate = coding.decompress(cursor, n_sites);
            if self.digit_sum(candidate, n_sites) == total {
                return Some(candidate);
            }
            cursor += 1;
        }
    }

    fn rank(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        let coding = self.coding();
        let mut counter = PartitionCounter::new(self.local_dim());
        let mut remaining = Self::total(sector);
        let mut rank = 0u64;
        for site in (0..n_sites).rev() {
            let digit = coding.get(state, site);
            for smaller in 0..digit {
                if smaller <= remaining {
                    rank += counter.count(remaining - smaller, site);
                }
            }
            remaining -= digit;
        }
        rank
    }

    fn unrank(&self, mut rank: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        let coding = self.coding();
        let mut counter = PartitionCounter::new(self.local_dim());
        let mut remaining = Self::total(sector);
        let mut state = 0u64;
        for site in (0..n_sites).rev() {
            if site == 0 {
                // one slot left: the remaining total is the digit
                debug_assert!(remaining < self.local_dim());
                state = coding.set(state, 0, remaining);
                break;
            }
            let mut chosen = self.local_dim();
            for digit in 0..=remaining.min(self.local_dim() - 1) {
                let completions = counter.count(remaining - digit, site);
                if rank < completions {
                    chosen = digit;
                    break;
                }
                rank -= completions;
            }
            debug_assert!(chosen < self.local_dim(), "rank out of range");
            state = coding.set(state, site, chosen);
            remaining -= chosen;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(family: &BoundedSpin, n_sites: u32, sector: &QuantumNumber) -> Vec<u64> {
        let mut states = vec![family.first(n_sites, sector).unwrap()];
        while let Some(next) = family.advance(*states.last().unwrap(), n_sites, sector) {
            states.push(next);
        }
        states
    }

    #[test]
    fn spin_one_half_filling() {
        let spin = BoundedSpin::new(3);
        let sector = QuantumNumber::Total(4);
        assert_eq!(spin.dimension(4, &sector), 19);
        let states = collect(&spin, 4, &sector);
        assert_eq!(states.len(), 19);
        assert!(states.windows(2).all(|pair| pair[0] < pair[1]));
        for &state in &states {
            assert_eq!(spin.quantum_number(state, 4), sector);
        }
    }

    #[test]
    fn boundary_states() {
        let spin = BoundedSpin::new(3);
        let sector = QuantumNumber::Total(4);
        // maximal digits pushed to the low sites, then to the high sites
        assert_eq!(spin.first(4, &sector), Some(0b00_00_10_10));
        assert_eq!(spin.last(4, &sector), Some(0b10_10_00_00));
        assert_eq!(spin.advance(0b10_10_00_00, 4, &sector), None);
    }

    #[test]
    fn rank_unrank_inverse() {
        let spin = BoundedSpin::new(4);
        for total in 0..=9u64 {
            let sector = QuantumNumber::Total(total);
            for rank in 0..spin.dimension(3, &sector) {
                let state = spin.unrank(rank, 3, &sector);
                assert_eq!(spin.quantum_number(state, 3), sector);
                assert_eq!(spin.rank(state, 3, &sector), rank);
            }
        }
    }

    #[test]
    fn enumeration_agrees_with_unrank() {
        let spin = BoundedSpin::new(3);
        let sector = QuantumNumber::Total(3);
        for (rank, &state) in collect(&spin, 4, &sector).iter().enumerate() {
            assert_eq!(spin.unrank(rank as u64, 4, &sector), state);
        }
    }

    #[test]
    fn sector_dimensions_sum_to_full_space() {
        let spin = BoundedSpin::new(3);
        let total: u64 = crate::qn::scalar_sectors(3, 4)
            .map(|sector| spin.dimension(4, &sector))
            .sum();
        assert_eq!(total, 81);
    }

    #[test]
    fn sector_validation() {
        let spin = BoundedSpin::new(3);
        assert!(spin.validate_sector(4, &QuantumNumber::Total(8)).is_ok());
        assert!(spin.validate_sector(4, &QuantumNumber::Total(9)).is_err());
        assert!(spin
            .validate_sector(4, &QuantumNumber::per_color([2, 2, 0]))
            .is_err());
    }
}
