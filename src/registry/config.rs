//! Registry configuration

use std::time::Duration;

/// Registry configuration options
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Deadline applied by `resolve_default` (None = wait indefinitely)
    pub resolve_timeout: Option<Duration>,
}

impl RegistryConfig {
    /// Set the default resolution deadline
    pub fn resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = Some(timeout);
        self
    }

    /// Wait indefinitely in `resolve_default`
    pub fn no_resolve_timeout(mut self) -> Self {
        self.resolve_timeout = None;
        self
    }
}
