//! Environment wrappers and registry.
mod registry;
mod time_limit;
pub use registry::{EnvRegistry, EnvSpec};
pub use time_limit::{TimeLimit, TimeLimitConfig};
