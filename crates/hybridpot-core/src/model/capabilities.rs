use crate::core::models::system::SpeciesCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Physical quantities a model can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Energy,
}

impl OutputKind {
    pub fn name(&self) -> &'static str {
        match self {
            OutputKind::Energy => "energy",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub quantity: String,
    pub unit: String,
    /// Whether the output may also be requested per atom.
    pub per_atom: bool,
}

/// What a model computes and in which units. Published once and never
/// changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub length_unit: String,
    pub supported_species: BTreeSet<SpeciesCode>,
    pub outputs: BTreeMap<OutputKind, OutputSpec>,
}

impl ModelCapabilities {
    pub fn energy_only(
        length_unit: &str,
        energy_unit: &str,
        supported_species: BTreeSet<SpeciesCode>,
        per_atom: bool,
    ) -> Self {
        let mut outputs = BTreeMap::new();
        outputs.insert(
            OutputKind::Energy,
            OutputSpec {
                quantity: OutputKind::Energy.name().to_string(),
                unit: energy_unit.to_string(),
                per_atom,
            },
        );
        Self {
            length_unit: length_unit.to_string(),
            supported_species,
            outputs,
        }
    }

    pub fn output(&self, kind: OutputKind) -> Option<&OutputSpec> {
        self.outputs.get(&kind)
    }

    pub fn supports_species(&self, species: SpeciesCode) -> bool {
        self.supported_species.contains(&species)
    }
}
