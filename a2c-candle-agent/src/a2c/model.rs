//! Actor-critic network.
use crate::{
    mlp::{Mlp, MlpConfig},
    model::SubModel1,
    util::softplus,
};
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::{Init, Linear, Module, VarBuilder};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`ActorCritic`].
pub struct ActorCriticConfig {
    /// Dimension of the observation.
    pub in_dim: usize,

    /// Dimension of the action.
    pub out_dim: usize,

    /// Hidden units of the actor.
    pub actor_units: Vec<usize>,

    /// Hidden units of the critic.
    pub critic_units: Vec<usize>,

    /// Lower bound of the uniform initialization of the output heads.
    pub head_init_min: f64,

    /// Upper bound of the uniform initialization of the output heads.
    pub head_init_max: f64,

    /// Added to the standard deviation after softplus.
    pub sigma_eps: f64,
}

impl Default for ActorCriticConfig {
    fn default() -> Self {
        Self {
            in_dim: 4,
            out_dim: 1,
            actor_units: vec![24],
            critic_units: vec![24, 24],
            head_init_min: -3e-3,
            head_init_max: 3e-5,
            sigma_eps: 1e-5,
        }
    }
}

impl ActorCriticConfig {
    /// Sets the dimension of the observation.
    pub fn in_dim(mut self, v: usize) -> Self {
        self.in_dim = v;
        self
    }

    /// Sets the dimension of the action.
    pub fn out_dim(mut self, v: usize) -> Self {
        self.out_dim = v;
        self
    }

    /// Sets hidden units of the actor.
    pub fn actor_units(mut self, v: Vec<usize>) -> Self {
        self.actor_units = v;
        self
    }

    /// Sets hidden units of the critic.
    pub fn critic_units(mut self, v: Vec<usize>) -> Self {
        self.critic_units = v;
        self
    }
}

/// Gaussian policy and state-value function in a single model.
///
/// `forward` takes observations of shape `(batch, in_dim)` and returns
/// `(mu, sigma, value)` of shapes `(batch, out_dim)`, `(batch, out_dim)`
/// and `(batch, 1)`. `sigma` is `softplus(.) + sigma_eps`, hence positive.
pub struct ActorCritic {
    actor: Mlp,
    mu: Linear,
    sigma: Linear,
    critic: Mlp,
    value: Linear,
    sigma_eps: f64,
}

fn head(in_dim: usize, out_dim: usize, config: &ActorCriticConfig, vb: VarBuilder) -> Result<Linear> {
    let init = Init::Uniform {
        lo: config.head_init_min,
        up: config.head_init_max,
    };
    let ws = vb.get_with_hints((out_dim, in_dim), "weight", init)?;
    let bs = vb.get_with_hints(out_dim, "bias", Init::Const(0.0))?;
    Ok(Linear::new(ws, Some(bs)))
}

impl SubModel1 for ActorCritic {
    type Config = ActorCriticConfig;
    type Input = Tensor;
    type Output = (Tensor, Tensor, Tensor);

    fn build(vb: VarBuilder, config: Self::Config) -> Result<Self> {
        let actor_config = MlpConfig::new(config.in_dim, config.actor_units.clone());
        let critic_config = MlpConfig::new(config.in_dim, config.critic_units.clone());
        let actor = Mlp::build(vb.pp("actor"), actor_config)?;
        let critic = Mlp::build(vb.pp("critic"), critic_config)?;
        let mu = head(actor.out_dim(), config.out_dim, &config, vb.pp("mu"))?;
        let sigma = head(actor.out_dim(), config.out_dim, &config, vb.pp("sigma"))?;
        let value = head(critic.out_dim(), 1, &config, vb.pp("value"))?;

        Ok(Self {
            actor,
            mu,
            sigma,
            critic,
            value,
            sigma_eps: config.sigma_eps,
        })
    }

    fn forward(&self, xs: &Self::Input) -> Result<Self::Output> {
        let h = self.actor.forward(xs)?;
        let mu = self.mu.forward(&h)?;
        let sigma = (softplus(&self.sigma.forward(&h)?)? + self.sigma_eps)?;
        let value = self.value.forward(&self.critic.forward(xs)?)?;
        Ok((mu, sigma, value))
    }
}
