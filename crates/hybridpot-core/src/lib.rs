//! # hybridpot
//!
//! An interatomic potential that adds a learned per-atom correction to a
//! truncated and shifted Lennard-Jones baseline, exposed through one
//! engine-agnostic calling contract so the same model can be driven by
//! different molecular-dynamics hosts.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless frame data (`PeriodicSystem`, host-built
//!   neighbor lists), the closed-form Lennard-Jones numerics and the learned
//!   correction (`NeuralAtomicModel`).
//!
//! - **[`model`]: The Contract.** Capabilities, run options and output records, the
//!   `Potential` trait every model implements, the `CompositeModel` that sums a
//!   baseline and a correction, and the conformance check that must pass before a
//!   model is handed to a host.
//!
//! - **[`workflows`]: The Public API.** Exporting a checked model to a portable
//!   artifact, loading it back, and finite-difference forces for hosts without
//!   their own differentiation.
//!
//! Every evaluation is a pure function of the frame and the run options; models
//! hold no mutable state and can be shared across threads.

pub mod core;
pub mod model;
pub mod workflows;

#[cfg(test)]
pub(crate) mod test_utils;
