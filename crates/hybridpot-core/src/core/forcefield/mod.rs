//! # Force Field Module
//!
//! Closed-form pair potentials and their parameter tables.
//!
//! - [`potentials`] - Pure Lennard-Jones functions, energy shift and mixing rules
//! - [`params`] - Per-species configuration, TOML loading and the combined pair table
//! - [`lennard_jones`] - The shifted Lennard-Jones baseline exposed as a [`Potential`]
//!
//! [`Potential`]: crate::model::potential::Potential

pub mod lennard_jones;
pub mod params;
pub mod potentials;
