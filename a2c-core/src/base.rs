//! Core functionalities.
mod agent;
mod env;
mod policy;
mod space;
mod step;
pub use agent::Agent;
pub use env::Env;
pub use policy::Policy;
pub use space::Space;
use std::fmt::Debug;
pub use step::{Info, Step, Transition};

/// An observation of an environment.
///
/// Environments are not vectorized, so an observation describes the state of
/// a single environment.
pub trait Obs: Clone + Debug {
    /// Returns the number of elements in the observation.
    fn len(&self) -> usize;
}

/// An action applied to an environment.
pub trait Act: Clone + Debug {
    /// Returns the number of elements in the action.
    fn len(&self) -> usize;
}
