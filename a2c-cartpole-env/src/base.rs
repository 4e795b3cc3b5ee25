use crate::{CartPoleAct, CartPoleConfig, CartPoleError, CartPoleObs};
use a2c_core::{record::Record, Env, Space, Step};
use anyhow::Result;
use log::warn;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// CartPole with a continuous action.
///
/// The force applied to the cart is `force_mag * action`, with the action in
/// `[min_action, max_action]`. The reward is `1.0` for every step, including
/// the step on which the episode terminates. The episode terminates when the
/// cart leaves `[-x_threshold, x_threshold]` or the pole angle leaves
/// `[-theta_threshold, theta_threshold]`. Episodes are not truncated here;
/// wrap the environment with [`TimeLimit`](a2c_core::TimeLimit) for that.
pub struct ContinuousCartPoleEnv {
    config: CartPoleConfig,
    seed: u64,
    rng: SmallRng,
    state: [f32; 4],
    steps_beyond_terminated: Option<usize>,
}

impl ContinuousCartPoleEnv {
    fn check_action(&self, a: &CartPoleAct) -> Result<f32, CartPoleError> {
        if a.0.len() != 1 {
            return Err(CartPoleError::ActionShape {
                expected: 1,
                actual: a.0.len(),
            });
        }

        let (lo, hi) = (self.config.min_action, self.config.max_action);
        let v = a.0[0];
        if (lo..=hi).contains(&v) {
            Ok(v)
        } else {
            Err(CartPoleError::ActionOutOfRange(v, lo, hi))
        }
    }

    fn is_terminated(&self) -> bool {
        let [x, _, theta, _] = self.state;
        x.abs() > self.config.x_threshold || theta.abs() > self.config.theta_threshold_radians()
    }

    /// Advances the state by one Euler step under the force `force`.
    fn integrate(&mut self, force: f32) {
        let c = &self.config;
        let [x, x_dot, theta, theta_dot] = self.state;
        let total_mass = c.mass_cart + c.mass_pole;
        let pole_mass_length = c.mass_pole * c.length;
        let (sin_theta, cos_theta) = theta.sin_cos();

        let temp = (force + pole_mass_length * theta_dot * theta_dot * sin_theta) / total_mass;
        let theta_acc = (c.gravity * sin_theta - cos_theta * temp)
            / (c.length * (4.0 / 3.0 - c.mass_pole * cos_theta * cos_theta / total_mass));
        let x_acc = temp - pole_mass_length * theta_acc * cos_theta / total_mass;

        self.state = [
            x + c.tau * x_dot,
            x_dot + c.tau * x_acc,
            theta + c.tau * theta_dot,
            theta_dot + c.tau * theta_acc,
        ];
    }

    fn reset_state(&mut self) -> CartPoleObs {
        let r = self.config.init_range;
        for s in self.state.iter_mut() {
            *s = self.rng.gen_range(-r..=r);
        }
        self.steps_beyond_terminated = None;
        CartPoleObs(self.state)
    }

    /// Sets the state of the cart and the pole.
    pub fn set_state(&mut self, state: [f32; 4]) {
        self.state = state;
        self.steps_beyond_terminated = None;
    }
}

impl Env for ContinuousCartPoleEnv {
    type Config = CartPoleConfig;
    type Obs = CartPoleObs;
    type Act = CartPoleAct;
    type Info = ();

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let seed = seed as u64;
        Ok(Self {
            config: config.clone(),
            seed,
            rng: SmallRng::seed_from_u64(seed),
            state: [0.0; 4],
            steps_beyond_terminated: None,
        })
    }

    fn step(&mut self, a: &Self::Act) -> Result<(Step<Self>, Record)> {
        let action = self.check_action(a)?;
        self.integrate(self.config.force_mag * action);

        let is_terminated = self.is_terminated();
        let reward = match self.steps_beyond_terminated {
            None => {
                if is_terminated {
                    self.steps_beyond_terminated = Some(0);
                }
                1.0
            }
            Some(n) => {
                if n == 0 {
                    warn!("step() is called after the episode terminated; call reset() first");
                }
                self.steps_beyond_terminated = Some(n + 1);
                0.0
            }
        };

        let step = Step::new(CartPoleObs(self.state), a.clone(), reward, is_terminated, false, ());
        Ok((step, Record::empty()))
    }

    fn reset(&mut self) -> Result<Self::Obs> {
        Ok(self.reset_state())
    }

    /// Resets with a random state determined by the seed of the environment
    /// and `ix`.
    fn reset_with_index(&mut self, ix: usize) -> Result<Self::Obs> {
        self.rng = SmallRng::seed_from_u64(self.seed.wrapping_add(ix as u64));
        Ok(self.reset_state())
    }

    fn observation_space(&self) -> Space {
        let high = [
            self.config.x_threshold * 2.0,
            f32::MAX,
            self.config.theta_threshold_radians() * 2.0,
            f32::MAX,
        ];
        Space::new(high.iter().map(|v| -v).collect(), high.to_vec())
    }

    fn action_space(&self) -> Space {
        Space::uniform(1, self.config.min_action, self.config.max_action)
    }
}
