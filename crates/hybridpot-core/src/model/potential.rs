use super::capabilities::ModelCapabilities;
use super::error::ModelError;
use super::options::RunOptions;
use super::output::OutputRecord;
use crate::core::models::neighbors::NeighborListRequest;
use crate::core::models::system::PeriodicSystem;

/// The calling contract every model in this crate exposes to a host.
///
/// `evaluate` is a pure function of its inputs: implementations hold no
/// mutable state, so one instance may serve many frames and many threads.
pub trait Potential: Send + Sync {
    fn capabilities(&self) -> &ModelCapabilities;

    /// Neighbor lists the host must attach to every frame before calling
    /// [`Potential::evaluate`]. This is static and does not depend on
    /// the run options.
    fn declared_neighbor_lists(&self) -> Vec<NeighborListRequest>;

    fn evaluate(
        &self,
        system: &PeriodicSystem,
        options: &RunOptions,
    ) -> Result<OutputRecord, ModelError>;
}
