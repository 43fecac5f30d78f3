use super::atomic::AtomicModelError;
use crate::core::forcefield::potentials::cosine_cutoff;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::{PeriodicSystem, SpeciesCode};
use crate::model::error::ConfigurationError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Turns the environment of each requested atom into a fixed-length feature
/// row. Row `k` of the result belongs to `atoms[k]`.
pub trait DescriptorProvider: Send + Sync {
    fn neighbor_list(&self) -> NeighborListRequest;

    fn size(&self) -> usize;

    fn compute(
        &self,
        system: &PeriodicSystem,
        atoms: &[usize],
    ) -> Result<DMatrix<f64>, AtomicModelError>;
}

/// A Gaussian radial shell `exp(-eta * (r - center)^2)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadialShell {
    pub eta: f64,
    pub center: f64,
}

/// Species-resolved radial symmetry functions with a cosine cutoff.
///
/// Feature `channel * shells.len() + k` sums shell `k` over the neighbors
/// whose species is `species[channel]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialSymmetryFunctions {
    pub cutoff: f64,
    pub species: Vec<SpeciesCode>,
    pub shells: Vec<RadialShell>,
}

impl RadialSymmetryFunctions {
    pub fn new(
        cutoff: f64,
        species: Vec<SpeciesCode>,
        shells: Vec<(f64, f64)>,
    ) -> Result<Self, ConfigurationError> {
        let descriptor = Self {
            cutoff,
            species,
            shells: shells
                .into_iter()
                .map(|(eta, center)| RadialShell { eta, center })
                .collect(),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(ConfigurationError::InvalidParameter {
                name: "descriptor cutoff",
                reason: format!("must be positive and finite, got {}", self.cutoff),
            });
        }
        if self.species.is_empty() {
            return Err(ConfigurationError::MissingParameter("descriptor species"));
        }
        if self.shells.is_empty() {
            return Err(ConfigurationError::MissingParameter("descriptor shells"));
        }
        for (index, species) in self.species.iter().enumerate() {
            if self.species[..index].contains(species) {
                return Err(ConfigurationError::DuplicateSpecies(*species));
            }
        }
        if self
            .shells
            .iter()
            .any(|s| !(s.eta.is_finite() && s.eta > 0.0 && s.center.is_finite()))
        {
            return Err(ConfigurationError::InvalidParameter {
                name: "descriptor shells",
                reason: "eta must be positive and centers finite".to_string(),
            });
        }
        Ok(())
    }

    fn channel(&self, species: SpeciesCode) -> Option<usize> {
        self.species.iter().position(|&s| s == species)
    }
}

impl DescriptorProvider for RadialSymmetryFunctions {
    fn neighbor_list(&self) -> NeighborListRequest {
        NeighborListRequest::full(self.cutoff)
    }

    fn size(&self) -> usize {
        self.species.len() * self.shells.len()
    }

    fn compute(
        &self,
        system: &PeriodicSystem,
        atoms: &[usize],
    ) -> Result<DMatrix<f64>, AtomicModelError> {
        let list = system.neighbors(&self.neighbor_list())?;

        let mut row_of = vec![None; system.len()];
        for (row, &atom) in atoms.iter().enumerate() {
            if atom >= system.len() {
                return Err(ConfigurationError::SelectedAtomOutOfRange {
                    atom,
                    atom_count: system.len(),
                }
                .into());
            }
            if row_of[atom].replace(row).is_some() {
                return Err(ConfigurationError::DuplicateSelectedAtom(atom).into());
            }
        }

        let mut features = DMatrix::zeros(atoms.len(), self.size());
        for pair in list.pairs() {
            let Some(row) = row_of[pair.first] else {
                continue;
            };
            let neighbor_species = system.species()[pair.second];
            let channel =
                self.channel(neighbor_species)
                    .ok_or(AtomicModelError::UnknownSpecies {
                        atom: pair.second,
                        species: neighbor_species,
                    })?;

            let dist = system.displacement(pair).norm();
            let fc = cosine_cutoff(dist, self.cutoff);
            if fc == 0.0 {
                continue;
            }
            for (k, shell) in self.shells.iter().enumerate() {
                let offset = dist - shell.center;
                features[(row, channel * self.shells.len() + k)] +=
                    (-shell.eta * offset * offset).exp() * fc;
            }
        }
        Ok(features)
    }
}
