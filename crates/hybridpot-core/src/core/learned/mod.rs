//! # Learned Correction Module
//!
//! The contract a learned per-atom model fulfils ([`atomic::AtomicModel`]) and a
//! reference neural implementation built from radial descriptors and a dense
//! readout.

pub mod atomic;
pub mod descriptor;
pub mod readout;
