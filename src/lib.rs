//! Plannode - plan node layer of a SQL query optimizer
//!
//! Features:
//! - Output schema generation and column index resolution over plan trees
//! - Statistics-driven cost estimation for sequential scans
//! - Sequential scans of base tables and of subqueries (derived tables)
//! - EXPLAIN rendering and a shared cache of compiled plans

pub mod catalog;
pub mod expr;
pub mod planner;
