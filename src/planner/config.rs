//! Planner configuration

/// Default row count assumed for tables without statistics
pub const DEFAULT_MAX_TUPLES: u64 = 1_000_000;

/// Default number of finalized plans kept by the plan cache
pub const DEFAULT_PLAN_CACHE_CAPACITY: usize = 128;

/// Configuration for plan compilation
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Row count assumed for tables without recorded statistics
    pub default_max_tuples: u64,

    /// Maximum number of compiled plans held by a [`PlanCache`](super::PlanCache)
    pub plan_cache_capacity: usize,

    /// Render EXPLAIN text as the last compilation step
    pub render_explain: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_max_tuples: DEFAULT_MAX_TUPLES,
            plan_cache_capacity: DEFAULT_PLAN_CACHE_CAPACITY,
            render_explain: true,
        }
    }
}

impl PlannerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the row count assumed for tables without statistics
    pub fn with_default_max_tuples(mut self, tuples: u64) -> Self {
        self.default_max_tuples = tuples;
        self
    }

    /// Set the plan cache capacity
    pub fn with_plan_cache_capacity(mut self, capacity: usize) -> Self {
        self.plan_cache_capacity = capacity.max(1);
        self
    }

    /// Enable or disable EXPLAIN rendering during compilation
    pub fn with_render_explain(mut self, render: bool) -> Self {
        self.render_explain = render;
        self
    }
}
