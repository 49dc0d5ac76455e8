//! Per-table row count estimates
//!
//! Statistics are a read-only snapshot handed to cost estimation. The
//! planner only needs a row-count proxy per table; `max_tuples` is the value
//! full-table scans are costed with.

use std::collections::HashMap;

use crate::planner::config::DEFAULT_MAX_TUPLES;

/// Row count bounds for one table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEstimates {
    /// Lower bound on the number of stored rows
    pub min_tuples: u64,
    /// Upper bound on the number of stored rows
    pub max_tuples: u64,
}

impl TableEstimates {
    /// Estimates with both bounds set to `tuples`
    pub fn exact(tuples: u64) -> Self {
        Self {
            min_tuples: tuples,
            max_tuples: tuples,
        }
    }

    /// Estimates assumed for a table nothing is recorded for
    pub fn unknown(max_tuples: u64) -> Self {
        Self {
            min_tuples: 0,
            max_tuples,
        }
    }
}

/// Read-only lookup from table name to row count estimates
pub trait StatisticsProvider: Send + Sync {
    /// Estimates for `table`; unknown tables yield a provider-defined default
    fn estimates_for_table(&self, table: &str) -> TableEstimates;

    /// Estimates actually recorded for `table`, if the provider can tell
    /// recorded values from its default
    fn recorded_estimates(&self, table: &str) -> Option<TableEstimates> {
        Some(self.estimates_for_table(table))
    }
}

/// Statistics for every table of a database, keyed case-insensitively
#[derive(Debug, Clone, Default)]
pub struct DatabaseEstimates {
    tables: HashMap<String, TableEstimates>,
}

impl DatabaseEstimates {
    /// Create an empty set of estimates
    pub fn new() -> Self {
        Self::default()
    }

    /// Record estimates for a table
    #[must_use]
    pub fn with_table(mut self, table: &str, estimates: TableEstimates) -> Self {
        self.set_table(table, estimates);
        self
    }

    /// Record or replace estimates for a table
    pub fn set_table(&mut self, table: &str, estimates: TableEstimates) {
        self.tables.insert(table.to_ascii_lowercase(), estimates);
    }
}

impl StatisticsProvider for DatabaseEstimates {
    fn estimates_for_table(&self, table: &str) -> TableEstimates {
        self.recorded_estimates(table)
            .unwrap_or_else(|| TableEstimates::unknown(DEFAULT_MAX_TUPLES))
    }

    fn recorded_estimates(&self, table: &str) -> Option<TableEstimates> {
        self.tables.get(&table.to_ascii_lowercase()).copied()
    }
}

/// Statistics view that answers unrecorded tables with a fixed fallback
pub struct FallbackStatistics<'a> {
    inner: &'a dyn StatisticsProvider,
    fallback: TableEstimates,
}

impl<'a> FallbackStatistics<'a> {
    /// Wrap `inner`, assuming `default_max_tuples` rows for unrecorded tables
    pub fn new(inner: &'a dyn StatisticsProvider, default_max_tuples: u64) -> Self {
        Self {
            inner,
            fallback: TableEstimates::unknown(default_max_tuples),
        }
    }
}

impl StatisticsProvider for FallbackStatistics<'_> {
    fn estimates_for_table(&self, table: &str) -> TableEstimates {
        self.inner.recorded_estimates(table).unwrap_or(self.fallback)
    }

    fn recorded_estimates(&self, table: &str) -> Option<TableEstimates> {
        self.inner.recorded_estimates(table)
    }
}
