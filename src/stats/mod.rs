//! Statistics for the identity registry

pub mod metrics;

pub use metrics::RegistryStats;
pub(crate) use metrics::RegistryCounters;
