//! # Core Module
//!
//! - **Frame Representation** ([`models`]) - Periodic systems and host-attached neighbor lists
//! - **Closed-Form Baseline** ([`forcefield`]) - Lennard-Jones functions, parameters and potential
//! - **Learned Correction** ([`learned`]) - The atomic-model contract and a neural reference model

pub mod forcefield;
pub mod learned;
pub mod models;
