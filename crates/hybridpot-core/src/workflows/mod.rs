//! # Workflows Module
//!
//! Host-facing procedures built on the model contract: exporting a checked
//! model to a portable artifact and loading it back ([`export`]), and
//! obtaining forces from any potential by finite differences ([`forces`]).

pub mod export;
pub mod forces;
