//! Sequential scan operator
//!
//! Reads every row of a table, or adapts every row of a subquery's result
//! into a derived table.

use tracing::debug;

use crate::catalog::{Catalog, StatisticsProvider};
use crate::expr::Expr;
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::node::{CostEstimates, PlanNode, PlanNodeId, ScalarValueHints};
use crate::planner::scan::ScanPlanNode;
use crate::planner::schema::{NodeSchema, SchemaColumn};

/// Sequential scan of a table or subquery
#[derive(Debug, Clone)]
pub struct SeqScanPlanNode {
    scan: ScanPlanNode,
}

impl SeqScanPlanNode {
    /// Sequential scan of a stored table
    pub fn new(table_name: impl Into<String>, table_alias: impl Into<String>) -> Self {
        Self {
            scan: ScanPlanNode::new(table_name, table_alias),
        }
    }

    /// Sequential scan over the rows of `child`, exposed as derived table
    /// `table_name`
    pub fn subquery(
        table_name: impl Into<String>,
        table_alias: impl Into<String>,
        child: PlanNode,
    ) -> Self {
        Self {
            scan: ScanPlanNode::subquery(table_name, table_alias, child),
        }
    }

    /// Attach a filter predicate
    #[must_use]
    pub fn with_predicate(mut self, predicate: Expr) -> Self {
        self.scan = self.scan.with_predicate(predicate);
        self
    }

    /// Shared scan state
    pub fn scan(&self) -> &ScanPlanNode {
        &self.scan
    }

    pub(crate) fn scan_mut(&mut self) -> &mut ScanPlanNode {
        &mut self.scan
    }

    /// Always false: storage order is not guaranteed to match across
    /// replicas.
    // TODO: return true for tables whose storage order is provably stable
    pub fn is_order_deterministic(&self) -> bool {
        false
    }

    pub(crate) fn generate_output_schema(
        &mut self,
        catalog: &Catalog,
    ) -> PlannerResult<NodeSchema> {
        let schema = self.generate_table_schema(catalog)?;
        self.scan.set_table_schema(schema.clone());
        Ok(schema)
    }

    fn generate_table_schema(&mut self, catalog: &Catalog) -> PlannerResult<NodeSchema> {
        let table_name = self.scan.target_table_name().to_string();
        let table_alias = self.scan.target_table_alias().to_string();

        let Some(child) = self.scan.subquery_child_mut() else {
            return self.scan.base_table_schema(catalog);
        };

        child.generate_output_schema(catalog)?;
        let child_schema = child.output_schema().ok_or_else(|| {
            PlannerError::InvalidPlan(format!("subquery of '{}' produced no schema", table_name))
        })?;

        // Rename the child's columns as columns of the derived table; the
        // alias, if any, becomes the column name.
        Ok(child_schema
            .columns()
            .iter()
            .map(|col| {
                SchemaColumn::new(
                    table_name.as_str(),
                    table_alias.as_str(),
                    col.effective_name(),
                    None,
                    col.expression.clone(),
                )
            })
            .collect())
    }

    pub(crate) fn resolve_column_indexes(
        &mut self,
        output: &mut NodeSchema,
        order: &mut Vec<PlanNodeId>,
    ) -> PlannerResult<()> {
        if let Some(child) = self.scan.subquery_child_mut() {
            child.resolve_into(order)?;

            // Derived column i reads position i of the child's output
            let alias = self.scan.target_table_alias();
            for (i, column) in output.columns_mut().iter_mut().enumerate() {
                column.expression = Expr::resolved_column(Some(alias), &column.column_name, i);
            }
        }
        self.scan.resolve_predicate()
    }

    pub(crate) fn compute_cost_estimates(
        &self,
        _child_output_estimate: u64,
        catalog: &Catalog,
        stats: &dyn StatisticsProvider,
        _hints: &[ScalarValueHints],
    ) -> PlannerResult<CostEstimates> {
        if self.scan.is_subquery() {
            // The child carries its own estimates.
            debug!(
                table = self.scan.target_table_name(),
                "subquery sequential scan costed at zero"
            );
            return Ok(CostEstimates::default());
        }

        let table = catalog.require_table(self.scan.target_table_name())?;
        let max_tuples = stats.estimates_for_table(&table.name).max_tuples;

        // Every stored row is read, and with no selectivity model every row
        // is assumed to survive the predicate. Index scans get no filter
        // discount either; keep the two consistent or plan choice skews.
        debug!(
            table = %table.name,
            processed = max_tuples,
            output = max_tuples,
            "sequential scan cost estimated"
        );
        Ok(CostEstimates::uniform(max_tuples))
    }

    pub(crate) fn explain_plan_for_node(&self, indent: &str) -> String {
        format!(
            "SEQUENTIAL SCAN of \"{}\"{}",
            self.scan.target_table_name(),
            self.scan.explain_predicate(&format!("\n{} filter by ", indent))
        )
    }
}
