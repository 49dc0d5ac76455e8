//! Catalog - Schema metadata consumed by the planner
//!
//! The catalog is a read-only snapshot for the duration of a compilation.
//! Table lookups by the planner are case-insensitive; the name a table was
//! registered under is its canonical name.

pub mod estimates;

use std::collections::HashMap;

use thiserror::Error;

pub use estimates::{DatabaseEstimates, FallbackStatistics, StatisticsProvider, TableEstimates};

/// SQL data types supported by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    /// Boolean (true/false)
    Boolean,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    BigInt,
    /// 64-bit floating point
    Double,
    /// Variable-length string with max length
    Varchar(u32),
    /// Timestamp (date and time)
    Timestamp,
}

/// Column definition
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Whether NULL values are allowed
    pub nullable: bool,
}

impl ColumnDef {
    /// Create a new column definition
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    /// Set nullable
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

/// Table definition
#[derive(Debug, Clone)]
pub struct TableDef {
    /// Table name
    pub name: String,
    /// Column definitions, in declaration order
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// Create a new table definition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Add a column
    #[must_use]
    pub fn column(mut self, col: ColumnDef) -> Self {
        self.columns.push(col);
        self
    }
}

/// Catalog error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Table already exists
    #[error("Table '{0}' already exists")]
    TableExists(String),
    /// Table not found
    #[error("Table '{0}' not found")]
    TableNotFound(String),
}

/// Database catalog - table metadata keyed by lowercase name
#[derive(Debug, Default)]
pub struct Catalog {
    /// Tables by lowercase name
    tables: HashMap<String, TableDef>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Create a table
    pub fn create_table(&mut self, def: TableDef) -> Result<(), CatalogError> {
        let key = def.name.to_ascii_lowercase();
        if self.tables.contains_key(&key) {
            return Err(CatalogError::TableExists(def.name));
        }
        self.tables.insert(key, def);
        Ok(())
    }

    /// Get a table definition, ignoring case
    pub fn get_table_ignore_case(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(&name.to_ascii_lowercase())
    }

    /// Get a table definition or fail with [`CatalogError::TableNotFound`]
    pub fn require_table(&self, name: &str) -> Result<&TableDef, CatalogError> {
        self.get_table_ignore_case(name)
            .ok_or_else(|| CatalogError::TableNotFound(name.to_string()))
    }
}
