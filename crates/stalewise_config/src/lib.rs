//! Configuration for stalewise.
//!
//! Everything the caching layer needs is passed in explicitly through
//! [`StalewiseConfig`]; there is no process-wide mutable state.

mod cache;
mod error;
mod global;
mod stalewise;
mod validation;

pub use cache::CacheConfig;
pub use error::ConfigLoadError;
pub use global::GlobalConfig;
pub use stalewise::StalewiseConfig;
pub use validation::ConfigReport;
