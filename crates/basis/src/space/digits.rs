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

//! Unconstrained N-ary digit strings.
//!
//! No conserved quantity: the sector is the whole space, the successor is a
//! plain mixed-radix increment, and rank/unrank are the compress/decompress
//! maps.  The full dimension `local_dim ^ n_sites` must fit in a `u64`, the
//! same precondition the counting primitives carry.

use crate::error::BasisError;
use crate::qn::QuantumNumber;
use crate::space::StateFamily;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Digits {
    local_dim: u8,
}

impl Digits {
    pub fn new(local_dim: u8) -> Self {
        debug_assert!((2..=8).contains(&local_dim));
        Self { local_dim }
    }
}

impl StateFamily for Digits {
    fn local_dim(&self) -> u64 {
        u64::from(self.local_dim)
    }

    fn name(&self) -> &'static str {
        match self.local_dim {
            2 => "digits2",
            3 => "digits3",
            4 => "digits4",
            5 => "digits5",
            6 => "digits6",
            7 => "digits7",
            8 => "digits8",
            _ => unreachable!("local dimension is within the closed family set"),
        }
    }

    fn quantum_number(&self, _state: u64, _n_sites: u32) -> QuantumNumber {
        QuantumNumber::Unrestricted
    }

    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError> {
        match sector {
            QuantumNumber::Unrestricted => Ok(()),
            _ => Err(BasisError::InvalidQuantumNumber {
                family: self.name(),
                n_sites,
                quantum_number: sector.to_string(),
            }),
        }
    }

    fn dimension(&self, n_sites: u32, _sector: &QuantumNumber) -> u64 {
        self.local_dim().pow(n_sites)
    }

    fn first(&self, _n_sites: u32, _sector: &QuantumNumber) -> Option<u64> {
        Some(0)
    }

    fn last(&self, n_sites: u32, _sector: &QuantumNumber) -> Option<u64> {
        let coding = self.coding();
        Some(coding.decompress(self.local_dim().pow(n_sites) - 1, n_sites))
    }

    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        if Some(state) == self.last(n_sites, sector) {
            return None;
        }
        let coding = self.coding();
        Some(coding.decompress(coding.compress(state, n_sites) + 1, n_sites))
    }

    fn rank(&self, state: u64, n_sites: u32, _sector: &QuantumNumber) -> u64 {
        self.coding().compress(state, n_sites)
    }

    fn unrank(&self, rank: u64, n_sites: u32, _sector: &QuantumNumber) -> u64 {
        self.coding().decompress(rank, n_sites)
    }
}
