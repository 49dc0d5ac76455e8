//! Query plan nodes
//!
//! Candidate execution plans are trees of [`PlanNode`]s. The planner builds a
//! tree bottom-up and then compiles it into its final form.
//!
//! ## Pipeline
//!
//! ```text
//! PlanNode tree
//!   → generate_output_schema()  (what columns each node produces)
//!   → resolve_column_indexes()  (bind column references to positions)
//!   → estimate_costs()          (row counts from table statistics)
//!   → explain_plan()            (human-readable rendering)
//! ```
//!
//! [`PlanCompiler`] drives the passes in order; [`PlanCache`] keeps the
//! resulting [`CompiledPlan`]s for reuse.
//!
//! ## Example
//!
//! ```ignore
//! use plannode::planner::{PlanCompiler, PlanNode, SeqScanPlanNode};
//!
//! let root = PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "ORDERS"));
//! let compiled = PlanCompiler::new(&catalog, &estimates).compile(root)?;
//! ```

pub mod cache;
pub mod compiler;
pub mod config;
pub mod error;
pub mod explain;
pub mod node;
pub mod projection;
pub mod scan;
pub mod schema;
pub mod seq_scan;

#[cfg(test)]
pub mod test_utils;

pub use cache::PlanCache;
pub use compiler::{CompiledPlan, PlanCompiler};
pub use config::PlannerConfig;
pub use error::{PlannerError, PlannerResult};
pub use explain::ExplainOutput;
pub use node::{
    CostEstimates, PlanNode, PlanNodeId, PlanNodeType, PlanOperator, ScalarValueHints,
};
pub use projection::ProjectionPlanNode;
pub use scan::{ScanPlanNode, ScanSource};
pub use schema::{NodeSchema, SchemaColumn};
pub use seq_scan::SeqScanPlanNode;
