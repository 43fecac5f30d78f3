use super::params::{LennardJonesConfig, SpeciesPairParameters};
use super::potentials;
use crate::core::models::neighbors::{NeighborListRequest, NeighborPair, NeighborPairSet};
use crate::core::models::system::PeriodicSystem;
use crate::model::capabilities::{ModelCapabilities, OutputKind};
use crate::model::error::{ConfigurationError, ModelError, NumericError};
use crate::model::options::RunOptions;
use crate::model::output::{EnergyTensor, OutputRecord};
use crate::model::potential::Potential;
use tracing::{instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

type PairResult = Result<(NeighborPair, f64), ModelError>;

/// Truncated and shifted Lennard-Jones potential over a half neighbor list.
///
/// A full list at the same cutoff is used when no half list is attached,
/// each directed pair then counting for half. Every pair in the list is
/// evaluated; `selected_atoms` is accepted but never restricts the sum.
#[derive(Debug, Clone)]
pub struct LennardJones {
    config: LennardJonesConfig,
    parameters: SpeciesPairParameters,
    capabilities: ModelCapabilities,
}

impl LennardJones {
    pub fn new(config: LennardJonesConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        let parameters = SpeciesPairParameters::build(&config.species, config.cutoff);
        let capabilities = ModelCapabilities::energy_only(
            &config.length_unit,
            &config.energy_unit,
            parameters.species(),
            true,
        );
        Ok(Self {
            config,
            parameters,
            capabilities,
        })
    }

    pub fn config(&self) -> &LennardJonesConfig {
        &self.config
    }

    pub fn parameters(&self) -> &SpeciesPairParameters {
        &self.parameters
    }

    pub fn cutoff(&self) -> f64 {
        self.config.cutoff
    }

    pub fn neighbor_request(&self) -> NeighborListRequest {
        NeighborListRequest::half(self.config.cutoff)
    }

    /// The attached half list, or the full list at the cutoff if there is no
    /// half list. A missing list is reported against the declared request.
    fn attached_list<'a>(
        &self,
        system: &'a PeriodicSystem,
    ) -> Result<&'a NeighborPairSet, ConfigurationError> {
        system.neighbors(&self.neighbor_request()).or_else(|missing| {
            system
                .neighbors(&NeighborListRequest::full(self.config.cutoff))
                .map_err(|_| missing)
        })
    }

    fn pair_energy(
        &self,
        system: &PeriodicSystem,
        pair: &NeighborPair,
        weight: f64,
    ) -> PairResult {
        let species = system.species();
        let params = self
            .parameters
            .get(species[pair.first], species[pair.second])
            .ok_or(ConfigurationError::UnsupportedSpecies {
                atom: pair.first,
                species: species[pair.first],
            })?;

        let dist = system.displacement(pair).norm();
        if dist == 0.0 {
            return Err(NumericError::ZeroSeparation {
                first: pair.first,
                second: pair.second,
            }
            .into());
        }
        if dist >= self.config.cutoff {
            return Ok((*pair, 0.0));
        }

        let energy = potentials::shifted_lennard_jones_12_6(
            dist,
            params.sigma,
            params.epsilon,
            params.shift,
        );
        if !energy.is_finite() {
            return Err(NumericError::NonFinitePairEnergy {
                first: pair.first,
                second: pair.second,
            }
            .into());
        }
        Ok((*pair, weight * energy))
    }

    fn pair_energies(
        &self,
        system: &PeriodicSystem,
        list: &NeighborPairSet,
    ) -> Result<Vec<(NeighborPair, f64)>, ModelError> {
        let weight = list.pair_weight();

        #[cfg(not(feature = "parallel"))]
        let iterator = list.pairs().iter();

        #[cfg(feature = "parallel")]
        let iterator = list.pairs().par_iter();

        let results: Vec<PairResult> = iterator
            .map(|pair| self.pair_energy(system, pair, weight))
            .collect();

        results.into_iter().collect()
    }
}

impl Potential for LennardJones {
    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        vec![self.neighbor_request()]
    }

    #[instrument(skip_all, name = "lennard_jones", fields(atoms = system.len()))]
    fn evaluate(
        &self,
        system: &PeriodicSystem,
        options: &RunOptions,
    ) -> Result<OutputRecord, ModelError> {
        options.validate(system, &self.capabilities)?;
        let Some(request) = options.output(OutputKind::Energy) else {
            trace!("Energy not requested; skipping Lennard-Jones evaluation.");
            return Ok(OutputRecord::new());
        };

        let list = self.attached_list(system)?;
        let terms = self.pair_energies(system, list)?;
        trace!(pairs = terms.len(), "Accumulated Lennard-Jones pair terms.");

        let unit = &self.config.energy_unit;
        let tensor = if request.per_atom {
            let mut per_atom = vec![0.0; system.len()];
            for (pair, energy) in &terms {
                per_atom[pair.first] += 0.5 * energy;
                per_atom[pair.second] += 0.5 * energy;
            }
            EnergyTensor::per_atom(per_atom, OutputKind::Energy, unit)
        } else {
            let total: f64 = terms.iter().map(|(_, energy)| energy).sum();
            EnergyTensor::global(total, OutputKind::Energy, unit)
        };

        let mut record = OutputRecord::new();
        record.insert(OutputKind::Energy, tensor);
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        PROPENOL_BASELINE_ENERGY, attach_neighbor_lists, propenol_frame, reference_config,
    };
    use nalgebra::{Matrix3, Point3};

    const TOLERANCE: f64 = 1e-10;

    fn baseline() -> LennardJones {
        LennardJones::new(reference_config()).unwrap()
    }

    fn prepared(model: &LennardJones, mut system: PeriodicSystem) -> PeriodicSystem {
        attach_neighbor_lists(&mut system, &model.declared_neighbor_lists());
        system
    }

    fn energy_of(model: &LennardJones, system: &PeriodicSystem) -> f64 {
        model
            .evaluate(system, &RunOptions::energy())
            .unwrap()
            .energy()
            .and_then(EnergyTensor::scalar)
            .unwrap()
    }

    fn dimer(species: [i32; 2], dist: f64) -> PeriodicSystem {
        PeriodicSystem::open(
            vec![Point3::origin(), Point3::new(dist, 0.0, 0.0)],
            species.to_vec(),
        )
        .unwrap()
    }

    #[test]
    fn propenol_frame_reproduces_reference_baseline_energy() {
        let model = baseline();
        let system = prepared(&model, propenol_frame());
        let energy = energy_of(&model, &system);
        assert!((energy - 3.05).abs() < 0.1);
        assert!((energy - PROPENOL_BASELINE_ENERGY).abs() < 1e-8);
    }

    #[test]
    fn pair_energy_vanishes_at_cutoff_for_every_species_pair() {
        let model = baseline();
        for (a, b) in [(1, 1), (1, 6), (1, 8), (6, 6), (6, 8), (8, 8)] {
            let params = model.parameters().get(a, b).unwrap();
            let at_cutoff = potentials::shifted_lennard_jones_12_6(
                model.cutoff(),
                params.sigma,
                params.epsilon,
                params.shift,
            );
            assert!(at_cutoff.abs() < 1e-18);
        }
    }

    #[test]
    fn swapping_species_leaves_pair_energy_unchanged() {
        let model = baseline();
        let forward = prepared(&model, dimer([1, 8], 1.8));
        let backward = prepared(&model, dimer([8, 1], 1.8));
        assert!((energy_of(&model, &forward) - energy_of(&model, &backward)).abs() < TOLERANCE);
    }

    #[test]
    fn dimer_energy_matches_shifted_formula() {
        let model = baseline();
        let system = prepared(&model, dimer([6, 8], 2.0));
        let params = model.parameters().get(6, 8).unwrap();
        let expected =
            potentials::lennard_jones_12_6(2.0, params.sigma, params.epsilon) - params.shift;
        assert!((energy_of(&model, &system) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn pairs_beyond_cutoff_contribute_nothing() {
        let model = baseline();
        let mut system = dimer([1, 1], 7.0);
        system
            .add_neighbor_list(NeighborPairSet::new(
                model.neighbor_request(),
                vec![NeighborPair::new(0, 1, [0, 0, 0])],
            ))
            .unwrap();
        assert_eq!(energy_of(&model, &system), 0.0);
    }

    #[test]
    fn overflowing_pair_energy_fails_with_numeric_error() {
        let model = baseline();
        let mut system = dimer([1, 1], 1e-30);
        system
            .add_neighbor_list(NeighborPairSet::new(
                model.neighbor_request(),
                vec![NeighborPair::new(0, 1, [0, 0, 0])],
            ))
            .unwrap();
        let result = model.evaluate(&system, &RunOptions::energy());
        assert!(matches!(
            result,
            Err(ModelError::Numeric(NumericError::NonFinitePairEnergy {
                first: 0,
                second: 1
            }))
        ));
    }

    #[test]
    fn coincident_atoms_fail_with_numeric_error() {
        let model = baseline();
        let mut system = dimer([1, 6], 0.0);
        system
            .add_neighbor_list(NeighborPairSet::new(
                model.neighbor_request(),
                vec![NeighborPair::new(0, 1, [0, 0, 0])],
            ))
            .unwrap();
        let result = model.evaluate(&system, &RunOptions::energy());
        assert!(matches!(
            result,
            Err(ModelError::Numeric(NumericError::ZeroSeparation {
                first: 0,
                second: 1
            }))
        ));
    }

    #[test]
    fn periodic_images_are_reconstructed_from_cell_shifts() {
        let config = crate::core::forcefield::params::LennardJonesConfigBuilder::new()
            .cutoff(4.5)
            .species(1, 2.32, 3.3104e-6)
            .build()
            .unwrap();
        let model = LennardJones::new(config).unwrap();
        let system = prepared(
            &model,
            PeriodicSystem::new(
                vec![Point3::new(1.0, 1.0, 1.0)],
                vec![1],
                Matrix3::from_diagonal_element(4.0),
            )
            .unwrap(),
        );

        assert_eq!(system.neighbors(&model.neighbor_request()).unwrap().len(), 3);
        let params = model.parameters().get(1, 1).unwrap();
        let image_pair =
            potentials::shifted_lennard_jones_12_6(4.0, params.sigma, params.epsilon, params.shift);
        let expected = 3.0 * image_pair;
        assert!((energy_of(&model, &system) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn full_list_gives_same_energy_as_half_list() {
        let model = baseline();
        let half = prepared(&model, propenol_frame());

        let mut full = propenol_frame();
        attach_neighbor_lists(&mut full, &[NeighborListRequest::full(model.cutoff())]);
        assert!(full.neighbors(&model.neighbor_request()).is_err());

        assert!((energy_of(&model, &full) - energy_of(&model, &half)).abs() < 1e-8);

        let per_atom = RunOptions::new().with_output(OutputKind::Energy, true);
        let from_half = model.evaluate(&half, &per_atom).unwrap();
        let from_full = model.evaluate(&full, &per_atom).unwrap();
        for (a, b) in from_half
            .energy()
            .unwrap()
            .values()
            .iter()
            .zip(from_full.energy().unwrap().values())
        {
            assert!((a - b).abs() < 1e-10);
        }
    }

    #[test]
    fn half_list_is_preferred_over_full_list() {
        let model = baseline();
        let mut system = prepared(&model, propenol_frame());
        let expected = energy_of(&model, &system);
        system
            .add_neighbor_list(NeighborPairSet::new(
                NeighborListRequest::full(model.cutoff()),
                Vec::new(),
            ))
            .unwrap();
        assert!((energy_of(&model, &system) - expected).abs() < TOLERANCE);
    }

    #[test]
    fn per_atom_energies_sum_to_global_energy() {
        let model = baseline();
        let system = prepared(&model, propenol_frame());
        let record = model
            .evaluate(&system, &RunOptions::new().with_output(OutputKind::Energy, true))
            .unwrap();
        let tensor = record.energy().unwrap();
        assert_eq!(tensor.values().len(), system.len());
        assert!((tensor.total() - energy_of(&model, &system)).abs() < 1e-8);
    }

    #[test]
    fn atom_selection_does_not_restrict_the_baseline() {
        let model = baseline();
        let system = prepared(&model, propenol_frame());
        let selected = model
            .evaluate(&system, &RunOptions::energy().with_selected_atoms(vec![0, 3]))
            .unwrap();
        assert!(
            (selected.energy().and_then(EnergyTensor::scalar).unwrap() - energy_of(&model, &system))
                .abs()
                < TOLERANCE
        );
    }

    #[test]
    fn unrequested_energy_returns_empty_record() {
        let model = baseline();
        let system = propenol_frame();
        let record = model.evaluate(&system, &RunOptions::new()).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn missing_neighbor_list_is_a_configuration_error() {
        let model = baseline();
        let result = model.evaluate(&propenol_frame(), &RunOptions::energy());
        assert!(matches!(
            result,
            Err(ModelError::Configuration(
                ConfigurationError::MissingNeighborList { .. }
            ))
        ));
    }

    #[test]
    fn unsupported_species_is_rejected_before_pair_work() {
        let model = baseline();
        let mut system = dimer([1, 7], 1.5);
        system
            .add_neighbor_list(NeighborPairSet::new(
                model.neighbor_request(),
                vec![NeighborPair::new(0, 1, [0, 0, 0])],
            ))
            .unwrap();
        let result = model.evaluate(&system, &RunOptions::energy());
        assert!(matches!(
            result,
            Err(ModelError::Configuration(
                ConfigurationError::UnsupportedSpecies {
                    atom: 1,
                    species: 7
                }
            ))
        ));
    }

    #[test]
    fn declares_a_half_list_at_the_cutoff() {
        assert_eq!(
            baseline().declared_neighbor_lists(),
            vec![NeighborListRequest::half(6.0)]
        );
    }
}
