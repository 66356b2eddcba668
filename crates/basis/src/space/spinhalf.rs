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

//! Two-level sites with a conserved number of up spins.
//!
//! The fast family: one bit per site, so sector enumeration is the classic
//! fixed-popcount bit-pattern walk and rank/unrank is the combination
//! bijection directly.

use crate::combinatorics::{binomial, next_bit_pattern, rank_combination, unrank_combination};
use crate::error::BasisError;
use crate::packing::low_bits;
use crate::qn::QuantumNumber;
use crate::space::StateFamily;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpinHalf;

impl SpinHalf {
    fn up_count(sector: &QuantumNumber) -> u64 {
        match sector {
            QuantumNumber::Total(count) => *count,
            _ => unreachable!("sector is validated before use"),
        }
    }
}

impl StateFamily for SpinHalf {
    fn local_dim(&self) -> u64 {
        2
    }

    fn name(&self) -> &'static str {
        "spinhalf"
    }

    fn quantum_number(&self, state: u64, n_sites: u32) -> QuantumNumber {
        QuantumNumber::Total(u64::from((state & low_bits(n_sites)).count_ones()))
    }

    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError> {
        match sector {
            QuantumNumber::Total(count) if *count <= u64::from(n_sites) => Ok(()),
            _ => Err(BasisError::InvalidQuantumNumber {
                family: self.name(),
                n_sites,
                quantum_number: sector.to_string(),
            }),
        }
    }

    fn dimension(&self, n_sites: u32, sector: &QuantumNumber) -> u64 {
        binomial(u64::from(n_sites), Self::up_count(sector) as i64)
    }

    fn first(&self, _n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        Some(low_bits(Self::up_count(sector) as u32))
    }

    fn last(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        let up = Self::up_count(sector) as u32;
        if up == 0 {
            Some(0)
        } else {
            Some(low_bits(up) << (n_sites - up))
        }
    }

    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        // `last` is reached exactly; stepping it would walk out of the word.
        if Some(state) == self.last(n_sites, sector) {
            None
        } else {
            Some(next_bit_pattern(state))
        }
    }

    fn rank(&self, state: u64, n_sites: u32, _sector: &QuantumNumber) -> u64 {
        rank_combination(state, n_sites)
    }

    fn unrank(&self, rank: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        unrank_combination(rank, Self::up_count(sector) as u32, n_sites)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_site_half_filling_enumerates_in_order() {
        let sector = QuantumNumber::Total(2);
        let mut states = vec![SpinHalf.first(4, &sector).unwrap()];
        while let Some(next) = SpinHalf.advance(*states.last().unwrap(), 4, &sector) {
            states.push(next);
        }
        assert_eq!(states, vec![0b0011, 0b0101, 0b0110, 0b1001, 0b1010, 0b1100]);
        assert_eq!(states.len() as u64, SpinHalf.dimension(4, &sector));
    }

    #[test]
    fn quantum_number_closure() {
        let sector = QuantumNumber::Total(3);
        let mut state = SpinHalf.first(6, &sector);
        while let Some(current) = state {
            assert_eq!(SpinHalf.quantum_number(current, 6), sector);
            state = SpinHalf.advance(current, 6, &sector);
        }
    }

    #[test]
    fn rank_unrank_inverse() {
        for up in 0..=6u64 {
            let sector = QuantumNumber::Total(up);
            for rank in 0..SpinHalf.dimension(6, &sector) {
                let state = SpinHalf.unrank(rank, 6, &sector);
                assert_eq!(SpinHalf.quantum_number(state, 6), sector);
                assert_eq!(SpinHalf.rank(state, 6, &sector), rank);
            }
        }
    }

    #[test]
    fn enumeration_agrees_with_unrank() {
        let sector = QuantumNumber::Total(2);
        let mut state = SpinHalf.first(5, &sector);
        let mut rank = 0;
        while let Some(current) = state {
            assert_eq!(SpinHalf.unrank(rank, 5, &sector), current);
            state = SpinHalf.advance(current, 5, &sector);
            rank += 1;
        }
        assert_eq!(rank, SpinHalf.dimension(5, &sector));
    }

    #[test]
    fn empty_and_full_sectors() {
        let empty = QuantumNumber::Total(0);
        assert_eq!(SpinHalf.first(4, &empty), Some(0));
        assert_eq!(SpinHalf.advance(0, 4, &empty), None);
        let full = QuantumNumber::Total(4);
        assert_eq!(SpinHalf.first(4, &full), Some(0b1111));
        assert_eq!(SpinHalf.advance(0b1111, 4, &full), None);
    }

    #[test]
    fn sector_validation() {
        assert!(SpinHalf.validate_sector(4, &QuantumNumber::Total(4)).is_ok());
        assert!(SpinHalf.validate_sector(4, &QuantumNumber::Total(5)).is_err());
        assert!(SpinHalf
            .validate_sector(4, &QuantumNumber::per_color([2, 2]))
            .is_err());
    }
}
