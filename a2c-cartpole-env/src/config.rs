use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ContinuousCartPoleEnv`](crate::ContinuousCartPoleEnv).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct CartPoleConfig {
    /// Gravitational acceleration.
    pub gravity: f32,

    /// Mass of the cart.
    pub mass_cart: f32,

    /// Mass of the pole.
    pub mass_pole: f32,

    /// Half of the pole length.
    pub length: f32,

    /// Force applied to the cart for the action `1.0`.
    pub force_mag: f32,

    /// Seconds between state updates.
    pub tau: f32,

    /// The episode terminates when the pole angle exceeds this value.
    pub theta_threshold_degrees: f32,

    /// The episode terminates when the cart position exceeds this value.
    pub x_threshold: f32,

    /// Lower bound of the action.
    pub min_action: f32,

    /// Upper bound of the action.
    pub max_action: f32,

    /// Each element of the initial state is drawn from `[-init_range, init_range]`.
    pub init_range: f32,
}

impl Default for CartPoleConfig {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            mass_cart: 1.0,
            mass_pole: 0.1,
            length: 0.5,
            force_mag: 30.0,
            tau: 0.02,
            theta_threshold_degrees: 12.0,
            x_threshold: 2.4,
            min_action: -1.0,
            max_action: 1.0,
            init_range: 0.05,
        }
    }
}

impl CartPoleConfig {
    /// Sets the force applied for the action `1.0`.
    pub fn force_mag(mut self, v: f32) -> Self {
        self.force_mag = v;
        self
    }

    /// Sets the range of the initial state.
    pub fn init_range(mut self, v: f32) -> Self {
        self.init_range = v;
        self
    }

    /// Pole angle threshold in radians.
    pub fn theta_threshold_radians(&self) -> f32 {
        self.theta_threshold_degrees.to_radians()
    }

    /// Constructs [`CartPoleConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`CartPoleConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
