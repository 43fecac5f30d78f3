use super::capabilities::{ModelCapabilities, OutputKind, OutputSpec};
use super::error::{ContractViolationError, ModelError};
use super::options::RunOptions;
use super::output::OutputRecord;
use super::potential::Potential;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::PeriodicSystem;
use tracing::{info, instrument};

/// A potential whose published capabilities were checked against what it
/// actually produces. Only ready models should be handed to a host.
#[derive(Debug, Clone)]
pub struct ReadyModel<P> {
    potential: P,
}

impl<P: Potential> ReadyModel<P> {
    /// Evaluates every declared output on `probe` (a frame with the declared
    /// neighbor lists attached) and compares the results with the
    /// declaration.
    #[instrument(skip_all, name = "conformance_check", fields(atoms = probe.len()))]
    pub fn check(potential: P, probe: &PeriodicSystem) -> Result<Self, ModelError> {
        let capabilities = potential.capabilities().clone();

        let empty = potential.evaluate(probe, &RunOptions::new())?;
        if !empty.is_empty() {
            return Err(ContractViolationError::NonEmptyForEmptyRequest(empty.len()).into());
        }

        let mut checked = 0usize;
        for (&kind, spec) in &capabilities.outputs {
            let modes: &[bool] = if spec.per_atom { &[false, true] } else { &[false] };
            for &per_atom in modes {
                let options = RunOptions::new().with_output(kind, per_atom);
                let first = potential.evaluate(probe, &options)?;
                check_record(&first, kind, spec, per_atom, probe.len())?;

                let second = potential.evaluate(probe, &options)?;
                if first != second {
                    return Err(ContractViolationError::NotIdempotent(kind).into());
                }
                checked += 1;
            }
        }

        info!(
            outputs = capabilities.outputs.len(),
            evaluations = checked,
            "Model passed the conformance check."
        );
        Ok(Self { potential })
    }

    pub fn potential(&self) -> &P {
        &self.potential
    }

    pub fn into_inner(self) -> P {
        self.potential
    }
}

fn check_record(
    record: &OutputRecord,
    kind: OutputKind,
    spec: &OutputSpec,
    per_atom: bool,
    atom_count: usize,
) -> Result<(), ContractViolationError> {
    if let Some(extra) = record.kinds().find(|&k| k != kind) {
        return Err(ContractViolationError::UnrequestedOutput(extra));
    }
    let tensor = record
        .get(kind)
        .ok_or(ContractViolationError::MissingOutput(kind))?;

    if tensor.property() != spec.quantity {
        return Err(ContractViolationError::PropertyMismatch {
            kind,
            declared: spec.quantity.clone(),
            produced: tensor.property().to_string(),
        });
    }
    if tensor.unit() != spec.unit {
        return Err(ContractViolationError::UnitMismatch {
            kind,
            declared: spec.unit.clone(),
            produced: tensor.unit().to_string(),
        });
    }

    let expected = if per_atom { atom_count } else { 1 };
    for found in [tensor.values().len(), tensor.samples().len()] {
        if found != expected {
            return Err(ContractViolationError::ShapeMismatch {
                kind,
                expected,
                found,
            });
        }
    }
    if tensor.samples().iter().any(|s| s.atom.is_some() != per_atom) {
        return Err(ContractViolationError::ShapeMismatch {
            kind,
            expected,
            found: tensor.samples().len(),
        });
    }
    if tensor.values().iter().any(|v| !v.is_finite()) {
        return Err(ContractViolationError::NonFiniteOutput(kind));
    }
    Ok(())
}

impl<P: Potential> Potential for ReadyModel<P> {
    fn capabilities(&self) -> &ModelCapabilities {
        self.potential.capabilities()
    }

    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest> {
        self.potential.declared_neighbor_lists()
    }

    fn evaluate(
        &self,
        system: &PeriodicSystem,
        options: &RunOptions,
    ) -> Result<OutputRecord, ModelError> {
        self.potential.evaluate(system, options)
    }
}
