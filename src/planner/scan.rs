//! State shared by scan operators
//!
//! A scan is "of" a target table: its name and alias label the scan's
//! schema and EXPLAIN text. In subquery mode the rows come from a single
//! child plan instead of a stored table, and the scan renames the child's
//! output as a derived table.

use crate::catalog::Catalog;
use crate::expr::Expr;
use crate::planner::error::{PlannerError, PlannerResult};
use crate::planner::node::PlanNode;
use crate::planner::schema::{NodeSchema, SchemaColumn};

/// Where a scan's rows come from
#[derive(Debug, Clone)]
pub enum ScanSource {
    /// Rows stored in the target table
    Table,
    /// Rows produced by exactly one child plan
    Subquery(Box<PlanNode>),
}

/// Target table, row source and filter of a scan operator
#[derive(Debug, Clone)]
pub struct ScanPlanNode {
    target_table_name: String,
    target_table_alias: String,
    source: ScanSource,
    predicate: Option<Expr>,
    /// Schema of the scanned rows, before any projection
    table_schema: Option<NodeSchema>,
}

impl ScanPlanNode {
    /// Scan of a stored table
    pub fn new(table_name: impl Into<String>, table_alias: impl Into<String>) -> Self {
        Self {
            target_table_name: table_name.into(),
            target_table_alias: table_alias.into(),
            source: ScanSource::Table,
            predicate: None,
            table_schema: None,
        }
    }

    /// Scan over the rows of `child`, exposed as derived table `table_name`
    pub fn subquery(
        table_name: impl Into<String>,
        table_alias: impl Into<String>,
        child: PlanNode,
    ) -> Self {
        Self {
            source: ScanSource::Subquery(Box::new(child)),
            ..Self::new(table_name, table_alias)
        }
    }

    /// Attach a filter predicate
    #[must_use]
    pub fn with_predicate(mut self, predicate: Expr) -> Self {
        self.predicate = Some(predicate);
        self
    }

    /// Name of the scanned (or derived) table
    pub fn target_table_name(&self) -> &str {
        &self.target_table_name
    }

    /// Alias of the scanned (or derived) table
    pub fn target_table_alias(&self) -> &str {
        &self.target_table_alias
    }

    /// Whether rows come from a child plan
    pub fn is_subquery(&self) -> bool {
        matches!(self.source, ScanSource::Subquery(_))
    }

    /// Row source
    pub fn source(&self) -> &ScanSource {
        &self.source
    }

    /// Filter predicate
    pub fn predicate(&self) -> Option<&Expr> {
        self.predicate.as_ref()
    }

    /// Schema of the scanned rows, once generated
    pub fn table_schema(&self) -> Option<&NodeSchema> {
        self.table_schema.as_ref()
    }

    pub(crate) fn set_table_schema(&mut self, schema: NodeSchema) {
        self.table_schema = Some(schema);
    }

    pub(crate) fn children(&self) -> &[PlanNode] {
        match &self.source {
            ScanSource::Table => &[],
            ScanSource::Subquery(child) => std::slice::from_ref(child.as_ref()),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [PlanNode] {
        match &mut self.source {
            ScanSource::Table => &mut [],
            ScanSource::Subquery(child) => std::slice::from_mut(child.as_mut()),
        }
    }

    pub(crate) fn subquery_child_mut(&mut self) -> Option<&mut PlanNode> {
        match &mut self.source {
            ScanSource::Table => None,
            ScanSource::Subquery(child) => Some(child.as_mut()),
        }
    }

    /// Table schema derived from the catalog definition of the target table
    pub(crate) fn base_table_schema(&self, catalog: &Catalog) -> PlannerResult<NodeSchema> {
        let table = catalog.require_table(&self.target_table_name)?;
        Ok(table
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                SchemaColumn::new(
                    self.target_table_name.as_str(),
                    self.target_table_alias.as_str(),
                    col.name.as_str(),
                    None,
                    Expr::resolved_column(Some(&self.target_table_alias), &col.name, i),
                )
            })
            .collect())
    }

    /// Bind the predicate's column references to the table schema
    pub(crate) fn resolve_predicate(&mut self) -> PlannerResult<()> {
        let schema = self.table_schema.as_ref().ok_or_else(|| {
            PlannerError::out_of_order("scan column resolution", "table schema generation")
        })?;
        if let Some(predicate) = self.predicate.as_mut() {
            predicate.resolve_columns(schema)?;
        }
        Ok(())
    }

    /// `prefix` followed by the predicate's EXPLAIN text, or nothing when the
    /// scan has no predicate
    pub fn explain_predicate(&self, prefix: &str) -> String {
        match &self.predicate {
            Some(p) => format!("{}{}", prefix, p.explain()),
            None => String::new(),
        }
    }
}
