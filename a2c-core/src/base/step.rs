//! Environment step.
use super::Env;

/// Additional information to `Obs` and `Act`.
pub trait Info {}

impl Info for () {}

/// Represents an action, observation and reward tuple `(a_t, o_t+1, r_t)`
/// with some additional information.
///
/// An environment emits [`Step`] object at every interaction steps.
pub struct Step<E: Env> {
    /// Action.
    pub act: E::Act,

    /// Observation.
    pub obs: E::Obs,

    /// Reward.
    pub reward: f32,

    /// Flag denoting if episode is terminated.
    pub is_terminated: bool,

    /// Flag denoting if episode is truncated.
    pub is_truncated: bool,

    /// Information defined by user.
    pub info: E::Info,
}

impl<E: Env> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(
        obs: E::Obs,
        act: E::Act,
        reward: f32,
        is_terminated: bool,
        is_truncated: bool,
        info: E::Info,
    ) -> Self {
        Step {
            act,
            obs,
            reward,
            is_terminated,
            is_truncated,
            info,
        }
    }

    #[inline]
    /// Terminated or truncated.
    pub fn is_done(&self) -> bool {
        self.is_terminated || self.is_truncated
    }
}

/// A single transition `(o_t, a_t, r_t, o_t+1, done_t)`.
///
/// The reward is the one the agent is trained with, which is not necessarily
/// the reward emitted by the environment.
pub struct Transition<E: Env> {
    /// Observation `o_t`.
    pub obs: E::Obs,

    /// Action `a_t`.
    pub act: E::Act,

    /// Reward `r_t`.
    pub reward: f32,

    /// Observation `o_t+1`.
    pub next_obs: E::Obs,

    /// `true` if the episode ended with this transition.
    pub is_done: bool,
}

impl<E: Env> Transition<E> {
    /// Constructs a [`Transition`] object.
    pub fn new(obs: E::Obs, act: E::Act, reward: f32, next_obs: E::Obs, is_done: bool) -> Self {
        Self {
            obs,
            act,
            reward,
            next_obs,
            is_done,
        }
    }
}
