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

//! The closed set of Hilbert-space families and their enumeration kernels.
//!
//! Each family supplies site coding, quantum-number extraction, the sector
//! successor that drives iteration, and the rank/unrank bijection between
//! sector states and dense indices.  Dispatch happens once at the API
//! boundary by matching [FamilyTag]; everything behind it is written against
//! [StateFamily].

use std::fmt;
use std::str::FromStr;

use crate::error::BasisError;
use crate::packing::SiteCoding;
use crate::qn::QuantumNumber;

mod bounded;
mod digits;
mod spinhalf;
mod sun;

pub use bounded::BoundedSpin;
pub use digits::Digits;
pub use spinhalf::SpinHalf;
pub use sun::Sun;

/// Enumeration and indexing kernel of one Hilbert-space family.
///
/// States of a sector form a strictly ascending sequence of packed words;
/// `first`/`last` bound it, `advance` steps it, and `rank`/`unrank` give the
/// order-isomorphism onto `0..dimension`.  All methods other than
/// `validate_sector` require a sector that already passed validation.
pub trait StateFamily {
    /// Number of local states per site.
    fn local_dim(&self) -> u64;

    /// Family name used in error reports and tags.
    fn name(&self) -> &'static str;

    fn coding(&self) -> SiteCoding {
        SiteCoding::new(self.local_dim())
    }

    fn n_bits(&self) -> u32 {
        self.coding().n_bits()
    }

    /// The conserved quantum number carried by a packed state.
    fn quantum_number(&self, state: u64, n_sites: u32) -> QuantumNumber;

    /// Check a target sector against the site count.
    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError>;

    /// Number of states in the sector.
    fn dimension(&self, n_sites: u32, sector: &QuantumNumber) -> u64;

    /// Smallest packed state of the sector, `None` for an empty sector.
    fn first(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64>;

    /// Largest packed state of the sector, `None` for an empty sector.
    fn last(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64>;

    /// Successor of `state` within the sector, `None` past the last state.
    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64>;

    /// Dense index of `state` within the ascending sector enumeration.
    fn rank(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> u64;

    /// Inverse of [StateFamily::rank].
    fn unrank(&self, rank: u64, n_sites: u32, sector: &QuantumNumber) -> u64;
}

/// Tag selecting one member of the closed family set.
///
/// The generic-spin and color tags cover local dimensions up to 8, the cap
/// implied by three bits per site; the set is closed at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FamilyTag {
    /// Two-level sites with a conserved up-spin count.
    SpinHalf,
    /// Bounded-digit sites with a conserved magnetization total.
    BoundedSpin { local_dim: u8 },
    /// N-color sites with conserved per-color populations.
    Sun { n_colors: u8 },
    /// Unconstrained N-ary digit strings.
    Digits { local_dim: u8 },
}

/// Expand a tag into its concrete family and evaluate `$body` against it.
macro_rules! dispatch {
    ($tag:expr, $family:ident => $body:expr) => {
        match $tag {
            FamilyTag::SpinHalf => {
                let $family = SpinHalf;
                $body
            }
            FamilyTag::BoundedSpin { local_dim } => {
                let $family = BoundedSpin::new(*local_dim);
                $body
            }
            FamilyTag::Sun { n_colors } => {
                let $family = Sun::new(*n_colors);
                $body
            }
            FamilyTag::Digits { local_dim } => {
                let $family = Digits::new(*local_dim);
                $body
            }
        }
    };
}

impl StateFamily for FamilyTag {
    fn local_dim(&self) -> u64 {
        dispatch!(self, family => family.local_dim())
    }

    fn name(&self) -> &'static str {
        dispatch!(self, family => family.name())
    }

    fn quantum_number(&self, state: u64, n_sites: u32) -> QuantumNumber {
        dispatch!(self, family => family.quantum_number(state, n_sites))
    }

    fn validate_sector(&self, n_sites: u32, sector: &QuantumNumber) -> Result<(), BasisError> {
        dispatch!(self, family => family.validate_sector(n_sites, sector))
    }

    fn dimension(&self, n_sites: u32, sector: &QuantumNumber) -> u64 {
        dispatch!(self, family => family.dimension(n_sites, sector))
    }

    fn first(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        dispatch!(self, family => family.first(n_sites, sector))
    }

    fn last(&self, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        dispatch!(self, family => family.last(n_sites, sector))
    }

    fn advance(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> Option<u64> {
        dispatch!(self, family => family.advance(state, n_sites, sector))
    }

    fn rank(&self, state: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        dispatch!(self, family => family.rank(state, n_sites, sector))
    }

    fn unrank(&self, rank: u64, n_sites: u32, sector: &QuantumNumber) -> u64 {
        dispatch!(self, family => family.unrank(rank, n_sites, sector))
    }
}

impl FromStr for FamilyTag {
    type Err = BasisError;

    fn from_str(tag: &str) -> Result<Self, BasisError> {
        match tag {
            "spinhalf" => Ok(Self::SpinHalf),
            "spinone" => Ok(Self::BoundedSpin { local_dim: 3 }),
            "spin3half" => Ok(Self::BoundedSpin { local_dim: 4 }),
            "spintwo" => Ok(Self::BoundedSpin { local_dim: 5 }),
            "spin5half" => Ok(Self::BoundedSpin { local_dim: 6 }),
            "spinthree" => Ok(Self::BoundedSpin { local_dim: 7 }),
            "spin7half" => Ok(Self::BoundedSpin { local_dim: 8 }),
            "u2" | "u3" | "u4" | "u5" | "u6" | "u7" | "u8" => Ok(Self::Sun {
                n_colors: tag.as_bytes()[1] - b'0',
            }),
            "digits2" | "digits3" | "digits4" | "digits5" | "digits6" | "digits7" | "digits8" => {
                Ok(Self::Digits {
                    local_dim: tag.as_bytes()[6] - b'0',
                })
            }
            _ => Err(BasisError::UnknownFamily(tag.to_string())),
        }
    }
}

impl fmt::Display for FamilyTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpinHalf => write!(f, "spinhalf"),
            Self::BoundedSpin { local_dim } => {
                write!(f, "{}", BoundedSpin::new(*local_dim).name())
            }
            Self::Sun { n_colors } => write!(f, "u{n_colors}"),
            Self::Digits { local_dim } => write!(f, "digits{local_dim}"),
        }
    }
}
