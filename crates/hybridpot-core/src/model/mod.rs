//! # Model Contract Module
//!
//! The engine-agnostic calling contract: what a model declares
//! ([`capabilities`]), what a host asks for ([`options`]), what comes back
//! ([`output`]), and the [`potential::Potential`] trait tying them together.
//! [`composite`] adds a baseline and a learned correction, and
//! [`conformance`] verifies a model against its own declaration.

pub mod capabilities;
pub mod composite;
pub mod conformance;
pub mod correction;
pub mod error;
pub mod options;
pub mod output;
pub mod potential;
