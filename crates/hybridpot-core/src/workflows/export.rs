use crate::core::forcefield::params::LennardJonesConfig;
use crate::core::learned::atomic::NeuralAtomicModel;
use crate::core::models::neighbors::NeighborListRequest;
use crate::model::capabilities::ModelCapabilities;
use crate::model::composite::HybridModel;
use crate::model::conformance::ReadyModel;
use crate::model::error::{ContractViolationError, ModelError};
use crate::model::potential::Potential;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("JSON error for '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("Artifact format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Artifact does not describe a valid model: {0}")]
    Model(#[from] ModelError),
}

/// Self-contained description of a hybrid model: the published contract and
/// every parameter needed to rebuild the evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub capabilities: ModelCapabilities,
    pub neighbor_lists: Vec<NeighborListRequest>,
    pub baseline: LennardJonesConfig,
    pub correction: NeuralAtomicModel,
}

impl ModelArtifact {
    /// Only models that passed the conformance check can be exported.
    pub fn from_model(model: &ReadyModel<HybridModel>) -> Self {
        let hybrid = model.potential();
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            capabilities: hybrid.capabilities().clone(),
            neighbor_lists: hybrid.declared_neighbor_lists(),
            baseline: hybrid.baseline().config().clone(),
            correction: hybrid.correction().model().clone(),
        }
    }

    /// Rebuilds the model and checks that it publishes exactly the contract
    /// recorded in the artifact.
    pub fn into_model(self) -> Result<HybridModel, ArtifactError> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion {
                found: self.format_version,
                supported: ARTIFACT_FORMAT_VERSION,
            });
        }
        self.correction.validate().map_err(ModelError::from)?;
        let model =
            HybridModel::from_parts(self.baseline, self.correction).map_err(ModelError::from)?;

        if model.capabilities() != &self.capabilities
            || model.declared_neighbor_lists() != self.neighbor_lists
        {
            return Err(ModelError::from(ContractViolationError::CapabilitiesMismatch).into());
        }
        Ok(model)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

pub fn export_model(model: &ReadyModel<HybridModel>, path: &Path) -> Result<(), ArtifactError> {
    let json = ModelArtifact::from_model(model)
        .to_json()
        .map_err(|e| ArtifactError::Json {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
    std::fs::write(path, json).map_err(|e| ArtifactError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    info!(path = %path.display(), "Exported model artifact.");
    Ok(())
}

/// Loads an artifact written by [`export_model`]. The returned model still
/// has to pass [`ReadyModel::check`] on a frame from the new host.
pub fn load_model(path: &Path) -> Result<HybridModel, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let artifact = ModelArtifact::from_json(&content).map_err(|e| ArtifactError::Json {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    let model = artifact.into_model()?;
    info!(path = %path.display(), "Loaded model artifact.");
    Ok(model)
}
