//! Plan compilation driver
//!
//! Runs the compilation passes over a candidate plan tree in their required
//! order and hands back a finalized, read-only plan.
//!
//! ## Example
//!
//! ```ignore
//! use plannode::planner::{PlanCompiler, PlanNode, SeqScanPlanNode};
//!
//! let root = PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "ORDERS"));
//! let compiled = PlanCompiler::new(&catalog, &estimates).compile(root)?;
//! println!("{}", compiled.explain().unwrap_or_default());
//! ```

use tracing::debug;

use crate::catalog::{Catalog, FallbackStatistics, StatisticsProvider};
use crate::planner::config::PlannerConfig;
use crate::planner::error::PlannerResult;
use crate::planner::node::{PlanNode, PlanNodeId, ScalarValueHints};
use crate::planner::schema::NodeSchema;

/// Drives the compilation passes against a catalog and statistics snapshot
pub struct PlanCompiler<'a> {
    catalog: &'a Catalog,
    stats: &'a dyn StatisticsProvider,
    hints: Vec<ScalarValueHints>,
    config: PlannerConfig,
}

impl<'a> PlanCompiler<'a> {
    /// Create a compiler with the default configuration
    pub fn new(catalog: &'a Catalog, stats: &'a dyn StatisticsProvider) -> Self {
        Self {
            catalog,
            stats,
            hints: Vec::new(),
            config: PlannerConfig::default(),
        }
    }

    /// Use a custom configuration
    ///
    /// `default_max_tuples` answers tables the statistics provider has no
    /// record of; `render_explain` controls EXPLAIN rendering.
    #[must_use]
    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    /// Supply per-parameter value hints to cost estimation
    #[must_use]
    pub fn with_value_hints(mut self, hints: Vec<ScalarValueHints>) -> Self {
        self.hints = hints;
        self
    }

    /// Compile a candidate plan tree
    ///
    /// Passes run in order: output schema generation, column index
    /// resolution, cost estimation, then EXPLAIN rendering when enabled.
    /// The first failing pass aborts compilation.
    pub fn compile(&self, mut root: PlanNode) -> PlannerResult<CompiledPlan> {
        root.generate_output_schema(self.catalog)?;
        let resolution_order = root.resolve_column_indexes()?;
        let stats = FallbackStatistics::new(self.stats, self.config.default_max_tuples);
        root.estimate_costs(self.catalog, &stats, &self.hints)?;

        let explain = self.config.render_explain.then(|| root.explain_plan());

        debug!(
            root_id = root.id(),
            nodes = resolution_order.len(),
            output_tuples = root.estimated_output_tuple_count(),
            "compiled plan"
        );

        Ok(CompiledPlan {
            root,
            resolution_order,
            explain,
        })
    }
}

/// A fully resolved plan tree
///
/// Only shared access is exposed, so a compiled plan can be handed to
/// concurrent readers (serializers, EXPLAIN, the plan cache) as-is.
#[derive(Debug, Clone)]
pub struct CompiledPlan {
    root: PlanNode,
    resolution_order: Vec<PlanNodeId>,
    explain: Option<String>,
}

impl CompiledPlan {
    /// Root of the plan tree
    pub fn root(&self) -> &PlanNode {
        &self.root
    }

    /// Output schema of the root
    pub fn output_schema(&self) -> Option<&NodeSchema> {
        self.root.output_schema()
    }

    /// Node ids in the order column resolution visited them
    pub fn resolution_order(&self) -> &[PlanNodeId] {
        &self.resolution_order
    }

    /// EXPLAIN text, if rendered during compilation
    pub fn explain(&self) -> Option<&str> {
        self.explain.as_deref()
    }

    /// Estimated number of rows the plan emits
    pub fn estimated_output_tuples(&self) -> u64 {
        self.root.estimated_output_tuple_count()
    }

    /// Whether the plan yields rows in a replay-safe order
    pub fn is_order_deterministic(&self) -> bool {
        self.root.is_order_deterministic()
    }

    /// Take back ownership of the tree
    pub fn into_root(self) -> PlanNode {
        self.root
    }
}
