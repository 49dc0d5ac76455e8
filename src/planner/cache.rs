//! Compiled plan cache
//!
//! Keeps recently compiled plans keyed by statement text. Plans are stored
//! behind `Arc` so any number of sessions can read the same compiled tree
//! without copying it.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::trace;

use crate::planner::compiler::CompiledPlan;
use crate::planner::config::PlannerConfig;
use crate::planner::error::PlannerResult;

/// Bounded LRU cache of compiled plans
pub struct PlanCache {
    entries: Mutex<LruCache<String, Arc<CompiledPlan>>>,
}

impl PlanCache {
    /// Create a cache holding at most `capacity` plans (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Create a cache sized from the planner configuration
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.plan_cache_capacity)
    }

    /// Look up a plan, marking it most recently used
    pub fn get(&self, key: &str) -> Option<Arc<CompiledPlan>> {
        let hit = self.entries.lock().get(key).cloned();
        trace!(key, hit = hit.is_some(), "plan cache lookup");
        hit
    }

    /// Insert a plan, evicting the least recently used one when full
    pub fn insert(&self, key: impl Into<String>, plan: CompiledPlan) -> Arc<CompiledPlan> {
        let plan = Arc::new(plan);
        self.entries.lock().put(key.into(), Arc::clone(&plan));
        plan
    }

    /// Return the cached plan for `key`, compiling and caching it on a miss
    ///
    /// Compilation runs without holding the cache lock. A failed compilation
    /// leaves the cache untouched.
    pub fn get_or_compile<F>(&self, key: &str, compile: F) -> PlannerResult<Arc<CompiledPlan>>
    where
        F: FnOnce() -> PlannerResult<CompiledPlan>,
    {
        if let Some(plan) = self.get(key) {
            return Ok(plan);
        }
        let plan = compile()?;
        Ok(self.insert(key, plan))
    }

    /// Number of cached plans
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of cached plans
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Drop every cached plan
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::from_config(&PlannerConfig::default())
    }
}
