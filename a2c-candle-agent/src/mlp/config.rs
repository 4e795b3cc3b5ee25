use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`Mlp`](super::Mlp).
pub struct MlpConfig {
    pub(super) in_dim: usize,
    pub(super) units: Vec<usize>,
}

impl MlpConfig {
    /// Creates configuration of MLP.
    ///
    /// * `units` - Number of units of each hidden layer.
    pub fn new(in_dim: usize, units: Vec<usize>) -> Self {
        Self { in_dim, units }
    }

    /// Dimension of the output, i.e., the units of the last layer, or the
    /// input dimension if there is no layer.
    pub fn out_dim(&self) -> usize {
        self.units.last().copied().unwrap_or(self.in_dim)
    }
}
