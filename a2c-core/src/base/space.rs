//! Bounds of observations and actions.
use serde::{Deserialize, Serialize};

/// A box in `R^n` given by elementwise lower and upper bounds.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Space {
    /// Lower bounds.
    pub low: Vec<f32>,

    /// Upper bounds.
    pub high: Vec<f32>,
}

impl Space {
    /// Constructs a space.
    ///
    /// Panics if `low` and `high` differ in length.
    pub fn new(low: Vec<f32>, high: Vec<f32>) -> Self {
        assert_eq!(low.len(), high.len());
        Self { low, high }
    }

    /// A space of `n` elements with the same bounds.
    pub fn uniform(n: usize, low: f32, high: f32) -> Self {
        Self {
            low: vec![low; n],
            high: vec![high; n],
        }
    }

    /// Number of elements.
    pub fn shape(&self) -> usize {
        self.low.len()
    }

    /// Returns `true` if `x` has the right length and lies in the box.
    pub fn contains(&self, x: &[f32]) -> bool {
        x.len() == self.shape()
            && x
                .iter()
                .zip(self.low.iter().zip(self.high.iter()))
                .all(|(v, (lo, hi))| lo <= v && v <= hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let space = Space::uniform(2, -1.0, 1.0);
        assert_eq!(space.shape(), 2);
        assert!(space.contains(&[0.0, 1.0]));
        assert!(!space.contains(&[0.0, 1.5]));
        assert!(!space.contains(&[0.0]));
    }
}
