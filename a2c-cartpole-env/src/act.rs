use a2c_core::Act;

/// Action of CartPole, the force applied to the cart divided by `force_mag`.
#[derive(Clone, Debug, PartialEq)]
pub struct CartPoleAct(pub Vec<f32>);

impl CartPoleAct {
    /// Constructs an action of a single value.
    pub fn new(v: f32) -> Self {
        Self(vec![v])
    }
}

impl Act for CartPoleAct {
    fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<Vec<f32>> for CartPoleAct {
    fn from(v: Vec<f32>) -> Self {
        Self(v)
    }
}

impl From<CartPoleAct> for Vec<f32> {
    fn from(act: CartPoleAct) -> Self {
        act.0
    }
}
