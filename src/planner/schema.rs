//! Output schemas of plan nodes
//!
//! A [`NodeSchema`] is the ordered list of columns a plan node produces.
//! Position is identity: parents refer to child columns by index, never by
//! name, once column resolution has run.

use crate::expr::Expr;
use crate::planner::error::{PlannerError, PlannerResult};

/// One output column together with its provenance
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaColumn {
    /// Table the column is attributed to
    pub table_name: String,
    /// Alias of that table in the query
    pub table_alias: String,
    /// Column name
    pub column_name: String,
    /// Alias given to the column, if any
    pub column_alias: Option<String>,
    /// Expression producing the column; owned by this column alone
    pub expression: Expr,
}

impl SchemaColumn {
    /// Create a new schema column
    pub fn new(
        table_name: impl Into<String>,
        table_alias: impl Into<String>,
        column_name: impl Into<String>,
        column_alias: Option<String>,
        expression: Expr,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            table_alias: table_alias.into(),
            column_name: column_name.into(),
            column_alias,
            expression,
        }
    }

    /// Alias when present, otherwise the column name
    pub fn effective_name(&self) -> &str {
        self.column_alias.as_deref().unwrap_or(&self.column_name)
    }

    /// Whether a (possibly qualified) column reference names this column
    pub fn matches(&self, table: Option<&str>, column: &str) -> bool {
        let table_ok = match table {
            Some(t) => {
                t.eq_ignore_ascii_case(&self.table_alias)
                    || t.eq_ignore_ascii_case(&self.table_name)
            }
            None => true,
        };
        let column_ok = self.column_name.eq_ignore_ascii_case(column)
            || self
                .column_alias
                .as_deref()
                .is_some_and(|a| a.eq_ignore_ascii_case(column));
        table_ok && column_ok
    }
}

/// Ordered output columns of a plan node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeSchema {
    columns: Vec<SchemaColumn>,
}

impl NodeSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column; insertion order is the projection order
    pub fn add_column(&mut self, column: SchemaColumn) {
        self.columns.push(column);
    }

    /// Columns in projection order
    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [SchemaColumn] {
        &mut self.columns
    }

    /// Column at `index`
    pub fn column(&self, index: usize) -> Option<&SchemaColumn> {
        self.columns.get(index)
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the column a reference names
    ///
    /// Unqualified references matching several columns are rejected;
    /// qualified ones take the first match.
    pub fn index_of(&self, table: Option<&str>, column: &str) -> PlannerResult<usize> {
        let mut matches = self
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(table, column))
            .map(|(i, _)| i);

        let first = matches.next().ok_or_else(|| {
            PlannerError::ColumnNotFound(match table {
                Some(t) => format!("{}.{}", t, column),
                None => column.to_string(),
            })
        })?;
        if table.is_none() && matches.next().is_some() {
            return Err(PlannerError::AmbiguousColumn(column.to_string()));
        }
        Ok(first)
    }
}

impl FromIterator<SchemaColumn> for NodeSchema {
    fn from_iter<I: IntoIterator<Item = SchemaColumn>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}
