//! Configuration: per-subsystem structs with serde defaults, loadable from TOML.
//!
//! Every field has a default, so an empty TOML string yields a fully working
//! configuration and partial files override only what they name.

pub mod defaults;

mod cache_config;
mod dispatch_config;
mod observability_config;
mod query_config;

pub use cache_config::CacheConfig;
pub use dispatch_config::DispatchConfig;
pub use observability_config::ObservabilityConfig;
pub use query_config::QueryConfig;

use serde::{Deserialize, Serialize};

/// Root configuration for the Trestle layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrestleConfig {
    pub dispatch: DispatchConfig,
    pub cache: CacheConfig,
    pub query: QueryConfig,
    pub observability: ObservabilityConfig,
}

impl TrestleConfig {
    /// Parse a TOML string. Missing sections and fields fall back to defaults.
    pub fn from_toml(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
