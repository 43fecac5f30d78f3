use super::descriptor::{DescriptorProvider, RadialSymmetryFunctions};
use super::readout::Readout;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::{PeriodicSystem, SpeciesCode};
use crate::model::error::ConfigurationError;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtomicModelError {
    #[error("Descriptor input is invalid: {0}")]
    Descriptor(#[from] ConfigurationError),

    #[error("No parameters for species {species} of atom {atom}")]
    UnknownSpecies { atom: usize, species: SpeciesCode },

    #[error("Readout expects {expected} features, descriptor produced {found}")]
    FeatureMismatch { expected: usize, found: usize },

    #[error("{0}")]
    Other(String),
}

/// A learned model mapping a frame to a per-structure energy.
///
/// Implementations must return the same value for the same frame and
/// selection, and the whole-system energy when `selected_atoms` is `None`.
pub trait AtomicModel: Send + Sync {
    fn supported_species(&self) -> BTreeSet<SpeciesCode>;

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        Vec::new()
    }

    fn predict(
        &self,
        system: &PeriodicSystem,
        selected_atoms: Option<&[usize]>,
    ) -> Result<f64, AtomicModelError>;
}

impl<M: AtomicModel + ?Sized> AtomicModel for &M {
    fn supported_species(&self) -> BTreeSet<SpeciesCode> {
        (**self).supported_species()
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        (**self).declared_neighbor_lists()
    }

    fn predict(
        &self,
        system: &PeriodicSystem,
        selected_atoms: Option<&[usize]>,
    ) -> Result<f64, AtomicModelError> {
        (**self).predict(system, selected_atoms)
    }
}

/// Per-atom neural network: radial descriptors fed through a dense readout,
/// plus a fixed composition energy for each species. The structure energy is
/// the sum over the selected atoms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuralAtomicModel {
    descriptor: RadialSymmetryFunctions,
    readout: Readout,
    composition: BTreeMap<SpeciesCode, f64>,
}

impl NeuralAtomicModel {
    pub fn new(
        descriptor: RadialSymmetryFunctions,
        readout: Readout,
        composition: BTreeMap<SpeciesCode, f64>,
    ) -> Result<Self, ConfigurationError> {
        let model = Self {
            descriptor,
            readout,
            composition,
        };
        model.validate()?;
        Ok(model)
    }

    /// Re-checks the invariants `new` enforces; used after deserialization.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.descriptor.validate()?;
        self.readout.validate()?;
        if self.readout.input_size() != self.descriptor.size() {
            return Err(ConfigurationError::InvalidParameter {
                name: "readout",
                reason: format!(
                    "expects {} inputs but the descriptor has {} features",
                    self.readout.input_size(),
                    self.descriptor.size()
                ),
            });
        }
        if self.readout.output_size() != 1 {
            return Err(ConfigurationError::InvalidParameter {
                name: "readout",
                reason: format!("must produce 1 output, not {}", self.readout.output_size()),
            });
        }
        if self.composition.is_empty() {
            return Err(ConfigurationError::MissingParameter("composition"));
        }
        if let Some(species) = self
            .composition
            .keys()
            .find(|s| !self.descriptor.species.contains(s))
        {
            return Err(ConfigurationError::InvalidParameter {
                name: "composition",
                reason: format!("species {species} has no descriptor channel"),
            });
        }
        Ok(())
    }

    pub fn descriptor(&self) -> &RadialSymmetryFunctions {
        &self.descriptor
    }

    pub fn readout(&self) -> &Readout {
        &self.readout
    }

    pub fn composition(&self) -> &BTreeMap<SpeciesCode, f64> {
        &self.composition
    }

    /// Energy contribution of each atom in `atoms`, in the same order.
    pub fn atomic_energies(
        &self,
        system: &PeriodicSystem,
        atoms: &[usize],
    ) -> Result<Vec<f64>, AtomicModelError> {
        let features = self.descriptor.compute(system, atoms)?;
        if features.ncols() != self.readout.input_size() {
            return Err(AtomicModelError::FeatureMismatch {
                expected: self.readout.input_size(),
                found: features.ncols(),
            });
        }

        atoms
            .iter()
            .enumerate()
            .map(|(row, &atom)| {
                let species = system.species()[atom];
                let offset = self
                    .composition
                    .get(&species)
                    .ok_or(AtomicModelError::UnknownSpecies { atom, species })?;
                let input: DVector<f64> = features.row(row).transpose();
                Ok(offset + self.readout.forward(input)[0])
            })
            .collect()
    }
}

impl AtomicModel for NeuralAtomicModel {
    fn supported_species(&self) -> BTreeSet<SpeciesCode> {
        self.composition.keys().copied().collect()
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        vec![self.descriptor.neighbor_list()]
    }

    fn predict(
        &self,
        system: &PeriodicSystem,
        selected_atoms: Option<&[usize]>,
    ) -> Result<f64, AtomicModelError> {
        let all_atoms: Vec<usize>;
        let atoms = match selected_atoms {
            Some(atoms) => atoms,
            None => {
                all_atoms = (0..system.len()).collect();
                &all_atoms
            }
        };
        Ok(self.atomic_energies(system, atoms)?.iter().sum())
    }
}
