use super::capabilities::OutputKind;
use std::collections::BTreeMap;

/// Identifies the structure (and, for per-atom outputs, the atom) a value
/// belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTag {
    pub system: usize,
    pub atom: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTensor {
    values: Vec<f64>,
    samples: Vec<SampleTag>,
    property: String,
    unit: String,
}

impl EnergyTensor {
    pub fn global(value: f64, kind: OutputKind, unit: &str) -> Self {
        Self {
            values: vec![value],
            samples: vec![SampleTag {
                system: 0,
                atom: None,
            }],
            property: kind.name().to_string(),
            unit: unit.to_string(),
        }
    }

    /// One value per atom, in atom order.
    pub fn per_atom(values: Vec<f64>, kind: OutputKind, unit: &str) -> Self {
        let samples = (0..values.len())
            .map(|atom| SampleTag {
                system: 0,
                atom: Some(atom),
            })
            .collect();
        Self {
            values,
            samples,
            property: kind.name().to_string(),
            unit: unit.to_string(),
        }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn samples(&self) -> &[SampleTag] {
        &self.samples
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn is_per_atom(&self) -> bool {
        self.samples.iter().any(|s| s.atom.is_some())
    }

    /// The value of a global output; `None` for per-atom outputs.
    pub fn scalar(&self) -> Option<f64> {
        match (self.is_per_atom(), self.values.as_slice()) {
            (false, [value]) => Some(*value),
            _ => None,
        }
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }
}

/// The outputs produced by one evaluation. Only requested kinds are present.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputRecord {
    outputs: BTreeMap<OutputKind, EnergyTensor>,
}

impl OutputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: OutputKind, tensor: EnergyTensor) {
        self.outputs.insert(kind, tensor);
    }

    pub fn get(&self, kind: OutputKind) -> Option<&EnergyTensor> {
        self.outputs.get(&kind)
    }

    pub fn energy(&self) -> Option<&EnergyTensor> {
        self.get(OutputKind::Energy)
    }

    pub fn kinds(&self) -> impl Iterator<Item = OutputKind> + '_ {
        self.outputs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }
}
