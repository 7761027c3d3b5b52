//! Concurrent memoization of resolutions.
//!
//! Resolution is a pure function of the request, so entries never need
//! invalidation. Failed resolutions are not cached.

use std::sync::Arc;

use dashmap::DashMap;
use ppf_core::ResolutionRequest;
use tracing::debug;

use crate::errors::Result;
use crate::pipeline::Pipeline;
use crate::trace::Resolution;

/// Resolution results keyed by request, shareable across threads.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    pipeline: Pipeline,
    entries: DashMap<ResolutionRequest, Arc<Resolution>>,
}

impl ResolutionCache {
    /// Empty cache over `pipeline`.
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            entries: DashMap::new(),
        }
    }

    /// The cached resolution for `request`, computing it on a miss.
    pub fn resolve(&self, request: &ResolutionRequest) -> Result<Arc<Resolution>> {
        if let Some(hit) = self.entries.get(request) {
            debug!(identity = %request.identity, standard = %request.standard, "cache hit");
            return Ok(Arc::clone(hit.value()));
        }

        let resolution = Arc::new(self.pipeline.resolve(request)?);
        // Concurrent misses for the same key compute identical values; keep the first.
        let entry = self
            .entries
            .entry(request.clone())
            .or_insert_with(|| Arc::clone(&resolution));
        Ok(Arc::clone(entry.value()))
    }

    /// The pipeline this cache resolves with.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Number of cached resolutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
