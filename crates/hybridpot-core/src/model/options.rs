use super::capabilities::{ModelCapabilities, OutputKind};
use super::error::ConfigurationError;
use crate::core::models::system::PeriodicSystem;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputRequest {
    pub per_atom: bool,
}

/// Per-call options supplied by the host.
///
/// `selected_atoms = None` means every atom of the system.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    outputs: BTreeMap<OutputKind, OutputRequest>,
    selected_atoms: Option<Vec<usize>>,
}

impl RunOptions {
    /// Options requesting nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options requesting the global energy of every atom.
    pub fn energy() -> Self {
        Self::new().with_output(OutputKind::Energy, false)
    }

    pub fn with_output(mut self, kind: OutputKind, per_atom: bool) -> Self {
        self.outputs.insert(kind, OutputRequest { per_atom });
        self
    }

    pub fn with_selected_atoms(mut self, atoms: Vec<usize>) -> Self {
        self.selected_atoms = Some(atoms);
        self
    }

    pub fn with_selection(mut self, atoms: Option<&[usize]>) -> Self {
        self.selected_atoms = atoms.map(<[usize]>::to_vec);
        self
    }

    pub fn outputs(&self) -> &BTreeMap<OutputKind, OutputRequest> {
        &self.outputs
    }

    pub fn output(&self, kind: OutputKind) -> Option<&OutputRequest> {
        self.outputs.get(&kind)
    }

    pub fn is_requested(&self, kind: OutputKind) -> bool {
        self.outputs.contains_key(&kind)
    }

    pub fn selected_atoms(&self) -> Option<&[usize]> {
        self.selected_atoms.as_deref()
    }

    /// Checks the request against what a model declared and the frame it
    /// targets. Runs before any numeric work.
    pub fn validate(
        &self,
        system: &PeriodicSystem,
        capabilities: &ModelCapabilities,
    ) -> Result<(), ConfigurationError> {
        for (&kind, request) in &self.outputs {
            let spec = capabilities
                .output(kind)
                .ok_or(ConfigurationError::UnsupportedOutput(kind))?;
            if request.per_atom && !spec.per_atom {
                return Err(ConfigurationError::PerAtomNotSupported(kind));
            }
        }

        if let Some(atoms) = &self.selected_atoms {
            let mut seen = BTreeSet::new();
            for &atom in atoms {
                if atom >= system.len() {
                    return Err(ConfigurationError::SelectedAtomOutOfRange {
                        atom,
                        atom_count: system.len(),
                    });
                }
                if !seen.insert(atom) {
                    return Err(ConfigurationError::DuplicateSelectedAtom(atom));
                }
            }
        }

        system.check_species(&capabilities.supported_species)
    }
}
