use a2c_core::Obs;

/// Observation of CartPole: cart position, cart velocity, pole angle and
/// pole angular velocity.
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleObs(pub [f32; 4]);

impl CartPoleObs {
    /// Cart position.
    pub fn x(&self) -> f32 {
        self.0[0]
    }

    /// Cart velocity.
    pub fn x_dot(&self) -> f32 {
        self.0[1]
    }

    /// Pole angle in radians.
    pub fn theta(&self) -> f32 {
        self.0[2]
    }

    /// Pole angular velocity.
    pub fn theta_dot(&self) -> f32 {
        self.0[3]
    }
}

impl Obs for CartPoleObs {
    fn len(&self) -> usize {
        4
    }
}

impl From<CartPoleObs> for Vec<f32> {
    fn from(obs: CartPoleObs) -> Self {
        obs.0.to_vec()
    }
}
