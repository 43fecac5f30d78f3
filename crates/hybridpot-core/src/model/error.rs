use super::capabilities::OutputKind;
use crate::core::learned::atomic::AtomicModelError;
use crate::core::models::system::SpeciesCode;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Species {0} is listed more than once")]
    DuplicateSpecies(SpeciesCode),

    #[error("Atom {atom} has species {species}, which this model does not support")]
    UnsupportedSpecies { atom: usize, species: SpeciesCode },

    #[error("System has {positions} positions but {species} species codes")]
    InconsistentSystem { positions: usize, species: usize },

    #[error("No neighbor list attached for cutoff {cutoff} (full_list = {full_list})")]
    MissingNeighborList { cutoff: f64, full_list: bool },

    #[error("Neighbor pair {pair} references atom {atom}, but the system has {atom_count} atoms")]
    NeighborIndexOutOfRange {
        pair: usize,
        atom: usize,
        atom_count: usize,
    },

    #[error("Neighbor pair {pair} pairs atom {atom} with itself inside the same cell")]
    SelfPairWithoutShift { pair: usize, atom: usize },

    #[error("Selected atom {atom} is out of range for a system of {atom_count} atoms")]
    SelectedAtomOutOfRange { atom: usize, atom_count: usize },

    #[error("Atom {0} is selected more than once")]
    DuplicateSelectedAtom(usize),

    #[error("Output '{0}' is not declared by this model")]
    UnsupportedOutput(OutputKind),

    #[error("Output '{0}' cannot be computed per atom by this model")]
    PerAtomNotSupported(OutputKind),

    #[error("Sub-models disagree on the {quantity} unit: '{first}' vs '{second}'")]
    UnitMismatch {
        quantity: &'static str,
        first: String,
        second: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericError {
    #[error("Atoms {first} and {second} have zero separation")]
    ZeroSeparation { first: usize, second: usize },

    #[error("Pair ({first}, {second}) produced a non-finite energy")]
    NonFinitePairEnergy { first: usize, second: usize },

    #[error("Finite-difference step must be positive and finite, got {0}")]
    InvalidStep(f64),
}

#[derive(Debug, Error)]
pub enum ComputationError {
    #[error("Learned correction failed: {source}")]
    CorrectionFailed {
        #[from]
        source: AtomicModelError,
    },

    #[error("Learned correction returned a non-finite energy ({0})")]
    NonFiniteCorrection(f64),

    #[error("Sub-model did not produce a scalar '{0}' output")]
    MissingScalar(OutputKind),
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContractViolationError {
    #[error("Declared output '{0}' was not produced")]
    MissingOutput(OutputKind),

    #[error("Output '{0}' was produced without being requested")]
    UnrequestedOutput(OutputKind),

    #[error("Output '{kind}' is tagged '{produced}' while '{declared}' was declared")]
    PropertyMismatch {
        kind: OutputKind,
        declared: String,
        produced: String,
    },

    #[error("Output '{kind}' is reported in '{produced}' while '{declared}' was declared")]
    UnitMismatch {
        kind: OutputKind,
        declared: String,
        produced: String,
    },

    #[error("Output '{kind}' has {found} samples, expected {expected}")]
    ShapeMismatch {
        kind: OutputKind,
        expected: usize,
        found: usize,
    },

    #[error("Output '{0}' contains non-finite values on the probe frame")]
    NonFiniteOutput(OutputKind),

    #[error("Repeated evaluation of output '{0}' gave a different result")]
    NotIdempotent(OutputKind),

    #[error("An empty request produced {0} outputs")]
    NonEmptyForEmptyRequest(usize),

    #[error("Published capabilities differ from the capabilities of the rebuilt model")]
    CapabilitiesMismatch,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] NumericError),

    #[error("Computation error: {0}")]
    Computation(#[from] ComputationError),

    #[error("Contract violation: {0}")]
    ContractViolation(#[from] ContractViolationError),
}
