use super::neighbors::{NeighborListRequest, NeighborPair, NeighborPairSet};
use crate::model::error::ConfigurationError;
use nalgebra::{Matrix3, Point3, Vector3};
use std::collections::BTreeSet;

pub type SpeciesCode = i32;

/// One frame of a simulation: positions, species, the lattice and the
/// neighbor lists the host attached for this frame.
///
/// Rows of `cell` are the lattice vectors `a`, `b` and `c`. An all-zero cell
/// marks an open (non-periodic) system.
#[derive(Debug, Clone)]
pub struct PeriodicSystem {
    positions: Vec<Point3<f64>>,
    species: Vec<SpeciesCode>,
    cell: Matrix3<f64>,
    neighbor_lists: Vec<NeighborPairSet>,
}

impl PeriodicSystem {
    pub fn new(
        positions: Vec<Point3<f64>>,
        species: Vec<SpeciesCode>,
        cell: Matrix3<f64>,
    ) -> Result<Self, ConfigurationError> {
        if positions.len() != species.len() {
            return Err(ConfigurationError::InconsistentSystem {
                positions: positions.len(),
                species: species.len(),
            });
        }
        check_positions(&positions)?;
        if cell.iter().any(|v| !v.is_finite()) {
            return Err(ConfigurationError::InvalidParameter {
                name: "cell",
                reason: "lattice vectors must be finite".to_string(),
            });
        }
        Ok(Self {
            positions,
            species,
            cell,
            neighbor_lists: Vec::new(),
        })
    }

    pub fn open(
        positions: Vec<Point3<f64>>,
        species: Vec<SpeciesCode>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(positions, species, Matrix3::zeros())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn species(&self) -> &[SpeciesCode] {
        &self.species
    }

    pub fn cell(&self) -> &Matrix3<f64> {
        &self.cell
    }

    pub fn is_periodic(&self) -> bool {
        self.cell.iter().any(|&v| v != 0.0)
    }

    /// Attaches a host-built neighbor list, replacing any list built for the
    /// same request.
    pub fn add_neighbor_list(&mut self, list: NeighborPairSet) -> Result<(), ConfigurationError> {
        list.validate(self.len())?;
        self.neighbor_lists
            .retain(|existing| existing.request() != list.request());
        self.neighbor_lists.push(list);
        Ok(())
    }

    pub fn neighbor_lists(&self) -> &[NeighborPairSet] {
        &self.neighbor_lists
    }

    pub fn neighbors(
        &self,
        request: &NeighborListRequest,
    ) -> Result<&NeighborPairSet, ConfigurationError> {
        self.neighbor_lists
            .iter()
            .find(|list| list.request() == request)
            .ok_or(ConfigurationError::MissingNeighborList {
                cutoff: request.cutoff,
                full_list: request.full_list,
            })
    }

    /// Vector from `first` to the periodic image of `second` selected by the
    /// pair's cell shift.
    #[inline]
    pub fn displacement(&self, pair: &NeighborPair) -> Vector3<f64> {
        let shift = Vector3::new(
            f64::from(pair.cell_shift[0]),
            f64::from(pair.cell_shift[1]),
            f64::from(pair.cell_shift[2]),
        );
        self.positions[pair.second] - self.positions[pair.first] + self.cell.transpose() * shift
    }

    pub fn check_species(
        &self,
        supported: &BTreeSet<SpeciesCode>,
    ) -> Result<(), ConfigurationError> {
        match self
            .species
            .iter()
            .enumerate()
            .find(|(_, species)| !supported.contains(species))
        {
            Some((atom, &species)) => Err(ConfigurationError::UnsupportedSpecies { atom, species }),
            None => Ok(()),
        }
    }

    /// Copy of this frame with new positions. Attached neighbor lists are kept
    /// as-is, which is only meaningful for small displacements.
    pub fn with_positions(&self, positions: Vec<Point3<f64>>) -> Result<Self, ConfigurationError> {
        if positions.len() != self.species.len() {
            return Err(ConfigurationError::InconsistentSystem {
                positions: positions.len(),
                species: self.species.len(),
            });
        }
        check_positions(&positions)?;
        Ok(Self {
            positions,
            species: self.species.clone(),
            cell: self.cell,
            neighbor_lists: self.neighbor_lists.clone(),
        })
    }
}

fn check_positions(positions: &[Point3<f64>]) -> Result<(), ConfigurationError> {
    match positions.iter().position(|p| p.iter().any(|v| !v.is_finite())) {
        Some(atom) => Err(ConfigurationError::InvalidParameter {
            name: "positions",
            reason: format!("atom {atom} has a non-finite coordinate"),
        }),
        None => Ok(()),
    }
}
