//! Optimizers.
use anyhow::Result;
use candle_core::{backprop::GradStore, Var};
use candle_nn::Optimizer as _;
use candle_optimisers::adam::{Adam, ParamsAdam};
use serde::{Deserialize, Serialize};

/// Configuration of optimizer for training neural networks in an RL agent.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub enum OptimizerConfig {
    /// Adam optimizer.
    Adam {
        /// Learning rate.
        lr: f64,
        #[serde(default = "default_eps")]
        /// Term added to the denominator.
        eps: f64,
    },
}

fn default_eps() -> f64 {
    1e-7
}

impl OptimizerConfig {
    /// Constructs an optimizer of the given variables.
    pub fn build(&self, vars: Vec<Var>) -> Result<Optimizer> {
        match &self {
            OptimizerConfig::Adam { lr, eps } => {
                let params = ParamsAdam {
                    lr: *lr,
                    eps: *eps,
                    ..ParamsAdam::default()
                };
                let opt = Adam::new(vars, params)?;
                Ok(Optimizer::Adam(opt))
            }
        }
    }

    /// Override learning rate.
    pub fn learning_rate(self, lr: f64) -> Self {
        match self {
            Self::Adam { lr: _, eps } => Self::Adam { lr, eps },
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam {
            lr: 0.001,
            eps: default_eps(),
        }
    }
}

/// Optimizers.
///
/// This is a thin wrapper of the optimizers of `candle-optimisers`.
pub enum Optimizer {
    /// Adam optimizer.
    Adam(Adam),
}

impl Optimizer {
    /// Updates the variables with the given gradients.
    pub fn step(&mut self, grads: &GradStore) -> Result<()> {
        match self {
            Self::Adam(opt) => Ok(opt.step(grads)?),
        }
    }
}

/// Rescales the gradient of each variable so that its L2 norm does not exceed
/// `max_norm`.
///
/// Every gradient tensor is clipped on its own; the global norm over all
/// variables is not used.
pub fn clip_grad_norm(vars: &[Var], grads: &mut GradStore, max_norm: f64) -> Result<()> {
    for var in vars.iter() {
        let clipped = match grads.get(var.as_tensor()) {
            None => None,
            Some(grad) => {
                let norm = grad.sqr()?.sum_all()?.sqrt()?.to_scalar::<f32>()? as f64;
                if norm > max_norm {
                    Some((grad * (max_norm / norm))?)
                } else {
                    None
                }
            }
        };

        if let Some(grad) = clipped {
            grads.insert(var.as_tensor(), grad);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_clip_grad_norm() -> Result<()> {
        let big = Var::from_slice(&[1f32, 1.0], (2,), &Device::Cpu)?;
        let small = Var::from_slice(&[0.1f32], (1,), &Device::Cpu)?;
        let loss = ((big.as_tensor() * 3.0)?.sum_all()? + (small.as_tensor() * 0.5)?.sum_all()?)?;
        let mut grads = loss.backward()?;

        clip_grad_norm(&[big.clone(), small.clone()], &mut grads, 1.0)?;

        // (3, 3) has norm 3 * sqrt(2)
        let g_big = grads.get(big.as_tensor()).unwrap().to_vec1::<f32>()?;
        let expected = 1.0 / 2f32.sqrt();
        assert!(g_big.iter().all(|g| (g - expected).abs() < 1e-5));

        // 0.5 is left as it is
        let g_small = grads.get(small.as_tensor()).unwrap().to_vec1::<f32>()?;
        assert!((g_small[0] - 0.5).abs() < 1e-6);
        Ok(())
    }

    #[test]
    fn test_serde_optimizer_config() -> Result<()> {
        let config = OptimizerConfig::default().learning_rate(0.01);
        let yaml = serde_yaml::to_string(&config)?;
        let config_: OptimizerConfig = serde_yaml::from_str(&yaml)?;
        assert_eq!(config, config_);
        assert_eq!(
            config,
            OptimizerConfig::Adam {
                lr: 0.01,
                eps: 1e-7
            }
        );
        Ok(())
    }

    #[test]
    fn test_eps_defaults_when_omitted() -> Result<()> {
        let config: OptimizerConfig = serde_yaml::from_str("Adam:\n  lr: 0.002\n")?;
        assert_eq!(
            config,
            OptimizerConfig::Adam {
                lr: 0.002,
                eps: 1e-7
            }
        );
        Ok(())
    }
}
