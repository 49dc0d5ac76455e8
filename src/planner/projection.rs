//! Projection operator

use crate::catalog::{Catalog, StatisticsProvider};
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::node::{CostEstimates, PlanNode, PlanNodeId, ScalarValueHints};
use crate::planner::schema::{NodeSchema, SchemaColumn};

/// Computes an explicit list of output columns from its input's rows
#[derive(Debug, Clone)]
pub struct ProjectionPlanNode {
    input: Box<PlanNode>,
    columns: Vec<SchemaColumn>,
}

impl ProjectionPlanNode {
    /// Project `columns` out of the rows of `input`
    pub fn new(input: PlanNode, columns: Vec<SchemaColumn>) -> Self {
        Self {
            input: Box::new(input),
            columns,
        }
    }

    /// Input plan
    pub fn input(&self) -> &PlanNode {
        &self.input
    }

    pub(crate) fn input_mut(&mut self) -> &mut PlanNode {
        &mut self.input
    }

    /// Declared output columns
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    /// Projection preserves the input's row order
    pub fn is_order_deterministic(&self) -> bool {
        self.input.is_order_deterministic()
    }

    pub(crate) fn generate_output_schema(
        &mut self,
        catalog: &Catalog,
    ) -> PlannerResult<NodeSchema> {
        self.input.generate_output_schema(catalog)?;
        Ok(self.columns.iter().cloned().collect())
    }

    pub(crate) fn resolve_column_indexes(
        &mut self,
        output: &mut NodeSchema,
        order: &mut Vec<PlanNodeId>,
    ) -> PlannerResult<()> {
        self.input.resolve_into(order)?;
        let input_schema = self.input.output_schema().ok_or_else(|| {
            PlannerError::out_of_order("projection column resolution", "input schema generation")
        })?;
        for column in output.columns_mut() {
            column.expression.resolve_columns(input_schema)?;
        }
        Ok(())
    }

    pub(crate) fn compute_cost_estimates(
        &self,
        child_output_estimate: u64,
        _catalog: &Catalog,
        _stats: &dyn StatisticsProvider,
        _hints: &[ScalarValueHints],
    ) -> PlannerResult<CostEstimates> {
        Ok(CostEstimates::uniform(child_output_estimate))
    }

    pub(crate) fn explain_plan_for_node(&self, _indent: &str) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| match &c.column_alias {
                Some(alias) => format!("{} AS {}", c.column_name, alias),
                None => c.column_name.clone(),
            })
            .collect();
        format!("PROJECTION ({})", columns.join(", "))
    }
}
