//! Per-run caching decorator for team resolution.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use areas_core::error::Result;
use areas_core::platform::TeamResolver;

/// Wraps a [`TeamResolver`] so each distinct slug hits the platform at most
/// once per process run. The cache is process-scoped and never persisted;
/// failed lookups are not cached, so the originating error always
/// propagates.
pub struct CachingTeamResolver<R> {
    inner: R,
    cache: Mutex<HashMap<String, u64>>,
}

impl<R> CachingTeamResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<R: TeamResolver> TeamResolver for CachingTeamResolver<R> {
    async fn resolve_team_id(&self, slug: &str) -> Result<u64> {
        // The lock is held across the upstream call so concurrent lookups of
        // the same slug cannot race into duplicate requests.
        let mut cache = self.cache.lock().await;
        if let Some(&id) = cache.get(slug) {
            debug!(slug = %slug, team_id = id, "team id cache hit");
            return Ok(id);
        }

        let id = self.inner.resolve_team_id(slug).await?;
        cache.insert(slug.to_string(), id);
        Ok(id)
    }
}
