//! Processing context shared by link tasks.

use std::sync::Arc;

use crate::classify::StubRegistry;
use crate::config::ResolverConfig;
use crate::error_handling::ProcessingStats;

use super::resolver::ResolveOnce;

/// Shared resources needed to check a link.
#[derive(Clone)]
pub struct ProcessingContext {
    /// Single-shot resolver
    pub resolver: Arc<dyn ResolveOnce>,
    /// Timeout and recheck policy
    pub config: ResolverConfig,
    /// Stub destinations
    pub stubs: Arc<StubRegistry>,
    /// Error statistics tracker
    pub error_stats: Arc<ProcessingStats>,
}

impl ProcessingContext {
    /// Creates a context using the built-in stub registry.
    pub fn new(
        resolver: Arc<dyn ResolveOnce>,
        config: ResolverConfig,
        error_stats: Arc<ProcessingStats>,
    ) -> Self {
        Self {
            resolver,
            config,
            stubs: Arc::new(StubRegistry::builtin().clone()),
            error_stats,
        }
    }

    /// Replaces the stub registry.
    pub fn with_stub_registry(mut self, stubs: StubRegistry) -> Self {
        self.stubs = Arc::new(stubs);
        self
    }
}
