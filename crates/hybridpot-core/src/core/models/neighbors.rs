use crate::model::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// The kind of neighbor list a potential needs the host to maintain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeighborListRequest {
    pub cutoff: f64,
    pub full_list: bool,
}

impl NeighborListRequest {
    pub fn half(cutoff: f64) -> Self {
        Self {
            cutoff,
            full_list: false,
        }
    }

    pub fn full(cutoff: f64) -> Self {
        Self {
            cutoff,
            full_list: true,
        }
    }
}

/// One entry of a neighbor list. `cell_shift` counts how many lattice vectors
/// separate the image of `second` from the primary cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborPair {
    pub first: usize,
    pub second: usize,
    pub cell_shift: [i32; 3],
}

impl NeighborPair {
    pub fn new(first: usize, second: usize, cell_shift: [i32; 3]) -> Self {
        Self {
            first,
            second,
            cell_shift,
        }
    }

    #[inline]
    pub fn has_shift(&self) -> bool {
        self.cell_shift != [0, 0, 0]
    }
}

/// A neighbor list built by the host for a given [`NeighborListRequest`].
///
/// Half lists hold every undirected pair once, full lists hold both
/// directions. No ordering of the pairs is assumed anywhere in the crate.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborPairSet {
    request: NeighborListRequest,
    pairs: Vec<NeighborPair>,
}

impl NeighborPairSet {
    pub fn new(request: NeighborListRequest, pairs: Vec<NeighborPair>) -> Self {
        Self { request, pairs }
    }

    pub fn request(&self) -> &NeighborListRequest {
        &self.request
    }

    pub fn pairs(&self) -> &[NeighborPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Weight that turns a sum over this list into a sum over undirected pairs.
    #[inline]
    pub fn pair_weight(&self) -> f64 {
        if self.request.full_list { 0.5 } else { 1.0 }
    }

    pub fn validate(&self, atom_count: usize) -> Result<(), ConfigurationError> {
        for (index, pair) in self.pairs.iter().enumerate() {
            for atom in [pair.first, pair.second] {
                if atom >= atom_count {
                    return Err(ConfigurationError::NeighborIndexOutOfRange {
                        pair: index,
                        atom,
                        atom_count,
                    });
                }
            }
            if pair.first == pair.second && !pair.has_shift() {
                return Err(ConfigurationError::SelfPairWithoutShift {
                    pair: index,
                    atom: pair.first,
                });
            }
        }
        Ok(())
    }
}
