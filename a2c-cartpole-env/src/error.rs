use thiserror::Error;

/// Errors of [`ContinuousCartPoleEnv`](crate::ContinuousCartPoleEnv).
#[derive(Debug, Error, PartialEq)]
pub enum CartPoleError {
    /// The action has a wrong number of elements.
    #[error("Expected an action of {expected} elements, got {actual}")]
    ActionShape {
        /// Expected number of elements.
        expected: usize,
        /// Given number of elements.
        actual: usize,
    },

    /// The action is outside of the action space.
    #[error("Action {0} is out of [{1}, {2}]")]
    ActionOutOfRange(f32, f32, f32),
}
