use super::capabilities::{ModelCapabilities, OutputKind};
use super::error::{ComputationError, ModelError};
use super::options::RunOptions;
use super::output::{EnergyTensor, OutputRecord};
use super::potential::Potential;
use crate::core::learned::atomic::AtomicModel;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::PeriodicSystem;
use tracing::{instrument, trace};

/// Exposes an [`AtomicModel`] through the [`Potential`] contract. The atom
/// selection of the run options is forwarded to the model.
#[derive(Debug, Clone)]
pub struct LearnedCorrection<M> {
    model: M,
    energy_unit: String,
    capabilities: ModelCapabilities,
}

impl<M: AtomicModel> LearnedCorrection<M> {
    pub fn new(model: M, length_unit: &str, energy_unit: &str) -> Self {
        let capabilities = ModelCapabilities::energy_only(
            length_unit,
            energy_unit,
            model.supported_species(),
            false,
        );
        Self {
            model,
            energy_unit: energy_unit.to_string(),
            capabilities,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }
}

impl<M: AtomicModel> Potential for LearnedCorrection<M> {
    fn capabilities(&self) -> &ModelCapabilities {
        &self.capabilities
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        self.model.declared_neighbor_lists()
    }

    #[instrument(skip_all, name = "learned_correction", fields(atoms = system.len()))]
    fn evaluate(
        &self,
        system: &PeriodicSystem,
        options: &RunOptions,
    ) -> Result<OutputRecord, ModelError> {
        options.validate(system, &self.capabilities)?;
        if !options.is_requested(OutputKind::Energy) {
            trace!("Energy not requested; skipping learned correction.");
            return Ok(OutputRecord::new());
        }
        for request in self.model.declared_neighbor_lists() {
            system.neighbors(&request)?;
        }

        let energy = self
            .model
            .predict(system, options.selected_atoms())
            .map_err(ComputationError::from)?;
        if !energy.is_finite() {
            return Err(ComputationError::NonFiniteCorrection(energy).into());
        }

        let mut record = OutputRecord::new();
        record.insert(
            OutputKind::Energy,
            EnergyTensor::global(energy, OutputKind::Energy, &self.energy_unit),
        );
        Ok(record)
    }
}
