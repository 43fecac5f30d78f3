use super::capabilities::{ModelCapabilities, OutputKind};
use super::correction::LearnedCorrection;
use super::error::{ComputationError, ConfigurationError, ModelError};
use super::options::RunOptions;
use super::output::{EnergyTensor, OutputRecord};
use super::potential::Potential;
use crate::core::forcefield::lennard_jones::LennardJones;
use crate::core::forcefield::params::LennardJonesConfig;
use crate::core::learned::atomic::NeuralAtomicModel;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::PeriodicSystem;
use tracing::{debug, instrument, trace};

/// The shifted Lennard-Jones baseline plus the reference neural correction.
pub type HybridModel = CompositeModel<LennardJones, LearnedCorrection<NeuralAtomicModel>>;

/// Sum of a baseline potential and a learned correction.
///
/// The baseline always sees every atom. Only the correction receives the
/// caller's `selected_atoms`, so the composite energy is
/// `baseline(all atoms) + correction(selected atoms)`.
#[derive(Debug, Clone)]
pub struct CompositeModel<B, C> {
    baseline: B,
    correction: C,
    energy_unit: String,
    capabilities: ModelCapabilities,
}

impl<B: Potential, C: Potential> CompositeModel<B, C> {
    pub fn new(baseline: B, correction: C) -> Result<Self, ConfigurationError> {
        let base_caps = baseline.capabilities();
        let corr_caps = correction.capabilities();

        if base_caps.length_unit != corr_caps.length_unit {
            return Err(ConfigurationError::UnitMismatch {
                quantity: "length",
                first: base_caps.length_unit.clone(),
                second: corr_caps.length_unit.clone(),
            });
        }
        let base_energy = base_caps
            .output(OutputKind::Energy)
            .ok_or(ConfigurationError::UnsupportedOutput(OutputKind::Energy))?;
        let corr_energy = corr_caps
            .output(OutputKind::Energy)
            .ok_or(ConfigurationError::UnsupportedOutput(OutputKind::Energy))?;
        if base_energy.unit != corr_energy.unit {
            return Err(ConfigurationError::UnitMismatch {
                quantity: "energy",
                first: base_energy.unit.clone(),
                second: corr_energy.unit.clone(),
            });
        }

        let species = base_caps
            .supported_species
            .union(&corr_caps.supported_species)
            .copied()
            .collect();
        let energy_unit = base_energy.unit.clone();
        let capabilities =
            ModelCapabilities::energy_only(&base_caps.length_unit, &energy_unit, species, false);

        Ok(Self {
            baseline,
            correction,
            energy_unit,
            capabilities,
        })
    }

    pub fn baseline(&self) -> &B {
        &self.baseline
    }

    pub fn correction(&self) -> &C {
        &self.correction
    }
}

impl HybridModel {
    pub fn from_parts(
        baseline: LennardJonesConfig,
        correction: NeuralAtomicModel,
    ) -> Result<Self, ConfigurationError> {
        let baseline = LennardJones::new(baseline)?;
        let correction = LearnedCorrection::new(
            correction,
            &baseline.config().length_unit,
            &baseline.config().energy_unit,
        );
        Self::new(baseline, correction)
    }
}

fn scalar_energy(record: &OutputRecord) -> Result<f64, ComputationError> {
    record
        .energy()
        .and_then(EnergyTensor::scalar)
        .ok_or(ComputationError::MissingScalar(OutputKind::Energy))
}

impl<B: Potential, C: Potential> Potential for CompositeModel<B, C> {
    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        let mut lists = self.baseline.declared_neighbor_lists();
        for request in self.correction.declared_neighbor_lists() {
            if !lists.contains(&request) {
                lists.push(request);
            }
        }
        lists
    }

    #[instrument(skip_all, name = "composite_model", fields(atoms = system.len()))]
    fn evaluate(
        &self,
        system: &PeriodicSystem,
        options: &RunOptions,
    ) -> Result<OutputRecord, ModelError> {
        options.validate(system, &self.capabilities)?;
        if !options.is_requested(OutputKind::Energy) {
            trace!("Energy not requested; returning an empty record.");
            return Ok(OutputRecord::new());
        }

        // Both sub-models must accept the frame before either one runs.
        let baseline_options = RunOptions::energy();
        let correction_options = RunOptions::energy().with_selection(options.selected_atoms());
        baseline_options.validate(system, self.baseline.capabilities())?;
        correction_options.validate(system, self.correction.capabilities())?;
        for request in self.declared_neighbor_lists() {
            system.neighbors(&request)?;
        }

        let baseline = scalar_energy(&self.baseline.evaluate(system, &baseline_options)?)?;
        let correction = scalar_energy(&self.correction.evaluate(system, &correction_options)?)?;

        debug!(
            baseline,
            correction,
            selected = options.selected_atoms().map(<[usize]>::len),
            "Combined baseline and learned correction."
        );

        let mut record = OutputRecord::new();
        record.insert(
            OutputKind::Energy,
            EnergyTensor::global(baseline + correction, OutputKind::Energy, &self.energy_unit),
        );
        Ok(record)
    }
}
