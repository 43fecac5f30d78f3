use super::potentials;
use crate::core::models::system::SpeciesCode;
use crate::model::error::ConfigurationError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_LENGTH_UNIT: &str = "angstrom";
pub const DEFAULT_ENERGY_UNIT: &str = "eV";

fn default_length_unit() -> String {
    DEFAULT_LENGTH_UNIT.to_string()
}

fn default_energy_unit() -> String {
    DEFAULT_ENERGY_UNIT.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct SpeciesParams {
    pub code: SpeciesCode,
    pub sigma: f64,
    pub epsilon: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LennardJonesConfig {
    pub cutoff: f64,
    #[serde(default = "default_length_unit")]
    pub length_unit: String,
    #[serde(default = "default_energy_unit")]
    pub energy_unit: String,
    pub species: Vec<SpeciesParams>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameters in '{path}': {source}")]
    Invalid {
        path: String,
        source: ConfigurationError,
    },
}

impl LennardJonesConfig {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate().map_err(|e| ParamLoadError::Invalid {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.cutoff.is_finite() && self.cutoff > 0.0) {
            return Err(ConfigurationError::InvalidParameter {
                name: "cutoff",
                reason: format!("must be positive and finite, got {}", self.cutoff),
            });
        }
        if self.species.is_empty() {
            return Err(ConfigurationError::MissingParameter("species"));
        }

        let mut seen = HashSet::new();
        for params in &self.species {
            if !seen.insert(params.code) {
                return Err(ConfigurationError::DuplicateSpecies(params.code));
            }
            if !(params.sigma.is_finite() && params.sigma > 0.0) {
                return Err(ConfigurationError::InvalidParameter {
                    name: "sigma",
                    reason: format!("species {} has sigma {}", params.code, params.sigma),
                });
            }
            if !(params.epsilon.is_finite() && params.epsilon >= 0.0) {
                return Err(ConfigurationError::InvalidParameter {
                    name: "epsilon",
                    reason: format!("species {} has epsilon {}", params.code, params.epsilon),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct LennardJonesConfigBuilder {
    cutoff: Option<f64>,
    length_unit: Option<String>,
    energy_unit: Option<String>,
    species: Vec<SpeciesParams>,
}

impl LennardJonesConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn length_unit(mut self, unit: &str) -> Self {
        self.length_unit = Some(unit.to_string());
        self
    }
    pub fn energy_unit(mut self, unit: &str) -> Self {
        self.energy_unit = Some(unit.to_string());
        self
    }
    pub fn species(mut self, code: SpeciesCode, sigma: f64, epsilon: f64) -> Self {
        self.species.push(SpeciesParams {
            code,
            sigma,
            epsilon,
        });
        self
    }

    pub fn build(self) -> Result<LennardJonesConfig, ConfigurationError> {
        let config = LennardJonesConfig {
            cutoff: self
                .cutoff
                .ok_or(ConfigurationError::MissingParameter("cutoff"))?,
            length_unit: self.length_unit.unwrap_or_else(default_length_unit),
            energy_unit: self.energy_unit.unwrap_or_else(default_energy_unit),
            species: self.species,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Mixed parameters of one species pair, with the energy shift at the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairParameters {
    pub sigma: f64,
    pub epsilon: f64,
    pub shift: f64,
}

/// Lorentz-Berthelot parameters for every unordered species pair, built once
/// from the per-species table. Lookups are symmetric.
#[derive(Debug, Clone)]
pub struct SpeciesPairParameters {
    table: HashMap<(SpeciesCode, SpeciesCode), PairParameters>,
}

impl SpeciesPairParameters {
    pub fn build(species: &[SpeciesParams], cutoff: f64) -> Self {
        let table = species
            .iter()
            .combinations_with_replacement(2)
            .map(|pair| {
                let (a, b) = (pair[0], pair[1]);
                let (sigma, epsilon) =
                    potentials::lorentz_berthelot(a.sigma, a.epsilon, b.sigma, b.epsilon);
                let shift = potentials::energy_shift(cutoff, sigma, epsilon);
                (
                    Self::key(a.code, b.code),
                    PairParameters {
                        sigma,
                        epsilon,
                        shift,
                    },
                )
            })
            .collect();
        Self { table }
    }

    #[inline]
    fn key(a: SpeciesCode, b: SpeciesCode) -> (SpeciesCode, SpeciesCode) {
        if a <= b { (a, b) } else { (b, a) }
    }

    #[inline]
    pub fn get(&self, a: SpeciesCode, b: SpeciesCode) -> Option<&PairParameters> {
        self.table.get(&Self::key(a, b))
    }

    pub fn species(&self) -> BTreeSet<SpeciesCode> {
        self.table.keys().flat_map(|&(a, b)| [a, b]).collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
