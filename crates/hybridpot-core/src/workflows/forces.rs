use crate::core::models::system::PeriodicSystem;
use crate::model::capabilities::OutputKind;
use crate::model::error::{ComputationError, ModelError, NumericError};
use crate::model::options::RunOptions;
use crate::model::output::EnergyTensor;
use crate::model::potential::Potential;
use nalgebra::Vector3;
use tracing::{debug, instrument};

/// Global energy of `system` under the atom selection of `options`.
pub fn total_energy<P: Potential + ?Sized>(
    potential: &P,
    system: &PeriodicSystem,
    options: &RunOptions,
) -> Result<f64, ModelError> {
    let options = RunOptions::energy().with_selection(options.selected_atoms());
    let record = potential.evaluate(system, &options)?;
    record
        .energy()
        .and_then(EnergyTensor::scalar)
        .ok_or_else(|| ComputationError::MissingScalar(OutputKind::Energy).into())
}

/// Forces `-dE/dx` by central differences with displacement `step`.
///
/// The attached neighbor lists are reused for every displaced frame, so
/// `step` must be small against the host's list skin.
#[instrument(
    skip_all,
    name = "finite_difference_forces",
    fields(atoms = system.len(), step = step)
)]
pub fn finite_difference_forces<P: Potential + ?Sized>(
    potential: &P,
    system: &PeriodicSystem,
    options: &RunOptions,
    step: f64,
) -> Result<Vec<Vector3<f64>>, ModelError> {
    if !(step.is_finite() && step > 0.0) {
        return Err(NumericError::InvalidStep(step).into());
    }

    let mut forces = vec![Vector3::zeros(); system.len()];
    for atom in 0..system.len() {
        for axis in 0..3 {
            let mut positions = system.positions().to_vec();
            positions[atom][axis] += step;
            let displaced = system.with_positions(positions.clone())?;
            let forward = total_energy(potential, &displaced, options)?;

            positions[atom][axis] -= 2.0 * step;
            let backward = total_energy(potential, &system.with_positions(positions)?, options)?;

            forces[atom][axis] = -(forward - backward) / (2.0 * step);
        }
    }
    debug!(evaluations = 6 * system.len(), "Finite-difference forces computed.");
    Ok(forces)
}
