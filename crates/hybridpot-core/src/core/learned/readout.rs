use crate::model::error::ConfigurationError;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Tanh,
    Silu,
    Identity,
}

impl Activation {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Silu => x / (1.0 + (-x).exp()),
            Activation::Identity => x,
        }
    }
}

/// `activation(weights * x + bias)`. `weights` is `outputs x inputs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: DMatrix<f64>,
    pub bias: DVector<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn forward(&self, x: &DVector<f64>) -> DVector<f64> {
        let mut z = &self.weights * x + &self.bias;
        z.apply(|v| *v = self.activation.apply(*v));
        z
    }
}

/// Feed-forward network turning one atom's descriptor into its energy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Readout {
    layers: Vec<DenseLayer>,
}

impl Readout {
    pub fn new(layers: Vec<DenseLayer>) -> Result<Self, ConfigurationError> {
        let readout = Self { layers };
        readout.validate()?;
        Ok(readout)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.layers.is_empty() {
            return Err(ConfigurationError::MissingParameter("layers"));
        }
        for (index, layer) in self.layers.iter().enumerate() {
            if layer.bias.len() != layer.weights.nrows() {
                return Err(ConfigurationError::InvalidParameter {
                    name: "layers",
                    reason: format!(
                        "layer {index} has {} biases for {} outputs",
                        layer.bias.len(),
                        layer.weights.nrows()
                    ),
                });
            }
            if layer.weights.iter().chain(layer.bias.iter()).any(|v| !v.is_finite()) {
                return Err(ConfigurationError::InvalidParameter {
                    name: "layers",
                    reason: format!("layer {index} has non-finite parameters"),
                });
            }
        }
        for (index, pair) in self.layers.windows(2).enumerate() {
            if pair[1].weights.ncols() != pair[0].weights.nrows() {
                return Err(ConfigurationError::InvalidParameter {
                    name: "layers",
                    reason: format!(
                        "layer {} takes {} inputs but layer {index} produces {}",
                        index + 1,
                        pair[1].weights.ncols(),
                        pair[0].weights.nrows()
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn input_size(&self) -> usize {
        self.layers.first().map_or(0, |layer| layer.weights.ncols())
    }

    pub fn output_size(&self) -> usize {
        self.layers.last().map_or(0, |layer| layer.weights.nrows())
    }

    pub fn forward(&self, input: DVector<f64>) -> DVector<f64> {
        self.layers
            .iter()
            .fold(input, |x, layer| layer.forward(&x))
    }
}
