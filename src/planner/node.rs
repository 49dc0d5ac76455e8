//! Plan node abstraction
//!
//! A plan tree is built bottom-up by the planner and then driven through the
//! compilation passes, each a post-order traversal:
//!
//! ```text
//! generate_output_schema  (children first, then self)
//!   → resolve_column_indexes  (children first, then self)
//!   → estimate_costs  (children first; each node sees its child's output estimate)
//!   → explain_plan
//! ```
//!
//! Operators form a closed set ([`PlanOperator`]); every pass dispatches on it
//! exhaustively. Children are owned by their operator, so a tree never shares
//! nodes and cloning a node deep-copies its whole subtree.

use tracing::trace;

use crate::catalog::{Catalog, StatisticsProvider};
use crate::expr::Literal;
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::explain::ExplainOutput;
use crate::planner::projection::ProjectionPlanNode;
use crate::planner::schema::NodeSchema;
use crate::planner::seq_scan::SeqScanPlanNode;

/// Planner-assigned node identifier
pub type PlanNodeId = u32;

/// Discriminant identifying the operator of a plan node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlanNodeType {
    /// Sequential scan of a table or subquery
    SeqScan,
    /// Column projection
    Projection,
}

impl PlanNodeType {
    /// Upper-case operator name
    pub fn name(&self) -> &'static str {
        match self {
            PlanNodeType::SeqScan => "SEQSCAN",
            PlanNodeType::Projection => "PROJECTION",
        }
    }
}

/// Cost estimates of one node, meaningful after cost estimation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CostEstimates {
    /// Rows the node has to read or process
    pub processed_tuples: u64,
    /// Rows the node is expected to emit
    pub output_tuples: u64,
}

impl CostEstimates {
    /// Both counts set to `tuples`
    pub fn uniform(tuples: u64) -> Self {
        Self {
            processed_tuples: tuples,
            output_tuples: tuples,
        }
    }
}

/// Planner-supplied hints about a statement parameter's value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScalarValueHints {
    /// Smallest value the parameter is expected to take
    pub min: Option<Literal>,
    /// Largest value the parameter is expected to take
    pub max: Option<Literal>,
    /// Expected number of distinct values
    pub distinct_values: Option<u64>,
}

/// Closed set of operators a plan node can carry
#[derive(Debug, Clone)]
pub enum PlanOperator {
    /// Sequential scan
    SeqScan(SeqScanPlanNode),
    /// Projection
    Projection(ProjectionPlanNode),
}

impl From<SeqScanPlanNode> for PlanOperator {
    fn from(node: SeqScanPlanNode) -> Self {
        PlanOperator::SeqScan(node)
    }
}

impl From<ProjectionPlanNode> for PlanOperator {
    fn from(node: ProjectionPlanNode) -> Self {
        PlanOperator::Projection(node)
    }
}

/// One operator in a candidate execution plan
#[derive(Debug, Clone)]
pub struct PlanNode {
    id: PlanNodeId,
    operator: PlanOperator,
    /// None until output schema generation has run
    output_schema: Option<NodeSchema>,
    estimates: CostEstimates,
}

impl PlanNode {
    /// Wrap an operator into a node with the given id
    pub fn new(id: PlanNodeId, operator: impl Into<PlanOperator>) -> Self {
        Self {
            id,
            operator: operator.into(),
            output_schema: None,
            estimates: CostEstimates::default(),
        }
    }

    /// Node identifier
    pub fn id(&self) -> PlanNodeId {
        self.id
    }

    /// Operator carried by this node
    pub fn operator(&self) -> &PlanOperator {
        &self.operator
    }

    pub(crate) fn operator_mut(&mut self) -> &mut PlanOperator {
        &mut self.operator
    }

    /// Operator discriminant
    pub fn plan_node_type(&self) -> PlanNodeType {
        match &self.operator {
            PlanOperator::SeqScan(_) => PlanNodeType::SeqScan,
            PlanOperator::Projection(_) => PlanNodeType::Projection,
        }
    }

    /// Children in order
    pub fn children(&self) -> &[PlanNode] {
        match &self.operator {
            PlanOperator::SeqScan(scan) => scan.scan().children(),
            PlanOperator::Projection(proj) => std::slice::from_ref(proj.input()),
        }
    }

    fn children_mut(&mut self) -> &mut [PlanNode] {
        match &mut self.operator {
            PlanOperator::SeqScan(scan) => scan.scan_mut().children_mut(),
            PlanOperator::Projection(proj) => std::slice::from_mut(proj.input_mut()),
        }
    }

    /// Output schema, if schema generation has run
    pub fn output_schema(&self) -> Option<&NodeSchema> {
        self.output_schema.as_ref()
    }

    /// Current cost estimates
    pub fn estimates(&self) -> CostEstimates {
        self.estimates
    }

    /// Estimated number of rows processed by this node
    pub fn estimated_processed_tuple_count(&self) -> u64 {
        self.estimates.processed_tuples
    }

    /// Estimated number of rows emitted by this node
    pub fn estimated_output_tuple_count(&self) -> u64 {
        self.estimates.output_tuples
    }

    /// Whether replaying this node against identical state always yields
    /// rows in the same order
    pub fn is_order_deterministic(&self) -> bool {
        match &self.operator {
            PlanOperator::SeqScan(scan) => scan.is_order_deterministic(),
            PlanOperator::Projection(proj) => proj.is_order_deterministic(),
        }
    }

    /// Populate the output schema of this node and, where the operator needs
    /// them, of its descendants
    pub fn generate_output_schema(&mut self, catalog: &Catalog) -> PlannerResult<()> {
        let schema = match &mut self.operator {
            PlanOperator::SeqScan(scan) => scan.generate_output_schema(catalog)?,
            PlanOperator::Projection(proj) => proj.generate_output_schema(catalog)?,
        };
        trace!(
            node_id = self.id,
            node_type = self.plan_node_type().name(),
            columns = schema.len(),
            "generated output schema"
        );
        self.output_schema = Some(schema);
        Ok(())
    }

    /// Bind symbolic column references to positions in input schemas
    ///
    /// Children are resolved before their parent. Returns the ids of the
    /// resolved nodes in the order they were resolved.
    pub fn resolve_column_indexes(&mut self) -> PlannerResult<Vec<PlanNodeId>> {
        let mut order = Vec::new();
        self.resolve_into(&mut order)?;
        Ok(order)
    }

    pub(crate) fn resolve_into(&mut self, order: &mut Vec<PlanNodeId>) -> PlannerResult<()> {
        let output = self.output_schema.as_mut().ok_or_else(|| {
            PlannerError::out_of_order("column resolution", "output schema generation")
        })?;
        match &mut self.operator {
            PlanOperator::SeqScan(scan) => scan.resolve_column_indexes(output, order)?,
            PlanOperator::Projection(proj) => proj.resolve_column_indexes(output, order)?,
        }
        trace!(node_id = self.id, "resolved column indexes");
        order.push(self.id);
        Ok(())
    }

    /// Set this node's cost estimates
    ///
    /// Must run after the estimates of all children are final;
    /// `child_output_estimate` is the output estimate of the first child
    /// (0 for leaves).
    pub fn compute_cost_estimates(
        &mut self,
        child_output_estimate: u64,
        catalog: &Catalog,
        stats: &dyn StatisticsProvider,
        hints: &[ScalarValueHints],
    ) -> PlannerResult<()> {
        self.estimates = match &self.operator {
            PlanOperator::SeqScan(scan) => {
                scan.compute_cost_estimates(child_output_estimate, catalog, stats, hints)?
            }
            PlanOperator::Projection(proj) => {
                proj.compute_cost_estimates(child_output_estimate, catalog, stats, hints)?
            }
        };
        Ok(())
    }

    /// Estimate costs for the whole subtree, children before parents
    pub fn estimate_costs(
        &mut self,
        catalog: &Catalog,
        stats: &dyn StatisticsProvider,
        hints: &[ScalarValueHints],
    ) -> PlannerResult<()> {
        for child in self.children_mut() {
            child.estimate_costs(catalog, stats, hints)?;
        }
        let child_output = self
            .children()
            .first()
            .map(|c| c.estimated_output_tuple_count())
            .unwrap_or(0);
        self.compute_cost_estimates(child_output, catalog, stats, hints)
    }

    /// EXPLAIN text for this node alone
    pub fn explain_plan_for_node(&self, indent: &str) -> String {
        match &self.operator {
            PlanOperator::SeqScan(scan) => scan.explain_plan_for_node(indent),
            PlanOperator::Projection(proj) => proj.explain_plan_for_node(indent),
        }
    }

    /// EXPLAIN text for the whole subtree
    pub fn explain_plan(&self) -> String {
        ExplainOutput::format(self)
    }
}
