use super::MlpConfig;
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{Device, Tensor};
use candle_nn::{Init, Linear, Module, VarBuilder};

/// Creates a linear layer with Glorot-uniform weights and zero biases.
fn glorot_linear(in_dim: usize, out_dim: usize, vb: VarBuilder) -> Result<Linear> {
    let limit = (6.0 / (in_dim + out_dim) as f64).sqrt();
    let init = Init::Uniform {
        lo: -limit,
        up: limit,
    };
    let ws = vb.get_with_hints((out_dim, in_dim), "weight", init)?;
    let bs = vb.get_with_hints(out_dim, "bias", Init::Const(0.0))?;
    Ok(Linear::new(ws, Some(bs)))
}

/// Returns vector of linear modules from [`MlpConfig`].
fn create_linear_layers(vb: VarBuilder, config: &MlpConfig) -> Result<Vec<Linear>> {
    let mut in_dim = config.in_dim;
    let mut layers = Vec::with_capacity(config.units.len());

    for (i, &out_dim) in config.units.iter().enumerate() {
        layers.push(glorot_linear(in_dim, out_dim, vb.pp(format!("ln{}", i)))?);
        in_dim = out_dim;
    }

    Ok(layers)
}

/// Stack of hidden layers, each followed by tanh.
///
/// There is no output layer; models put their own heads on top.
pub struct Mlp {
    config: MlpConfig,
    device: Device,
    layers: Vec<Linear>,
}

impl Mlp {
    /// Dimension of the output.
    pub fn out_dim(&self) -> usize {
        self.config.out_dim()
    }
}

impl SubModel1 for Mlp {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = Tensor;

    fn forward(&self, xs: &Self::Input) -> Result<Tensor> {
        let mut xs = xs.to_device(&self.device)?;

        for layer in self.layers.iter() {
            xs = layer.forward(&xs)?.tanh()?;
        }

        Ok(xs)
    }

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vb.device().clone();
        let layers = create_linear_layers(vb.pp("mlp"), &config)?;

        Ok(Self {
            config,
            device,
            layers,
        })
    }
}
