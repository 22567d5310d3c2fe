//! Collector configuration.
//!
//! - [`CollectorConfig`]: the validated, immutable settings
//! - [`ConfigResolver`]: ordered provider chain (env var YAML file, then the
//!   ambient settings object) with a per-handle cache

mod collector_config;
mod providers;

pub use collector_config::CollectorConfig;

pub use providers::{AmbientConfigProvider, ConfigProvider, ConfigResolver, EnvYamlProvider};
