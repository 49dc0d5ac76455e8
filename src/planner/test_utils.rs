//! Shared test utilities for planner module tests

use crate::catalog::{Catalog, ColumnDef, DataType, TableDef};
use crate::expr::Expr;
use crate::planner::node::{PlanNode, PlanNodeId};
use crate::planner::projection::ProjectionPlanNode;
use crate::planner::schema::SchemaColumn;
use crate::planner::seq_scan::SeqScanPlanNode;

/// Create a test catalog with "EMP" and "T1" tables
pub fn test_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    let emp = TableDef::new("EMP")
        .column(ColumnDef::new("ID", DataType::Int).nullable(false))
        .column(ColumnDef::new("NAME", DataType::Varchar(100)))
        .column(ColumnDef::new("SALARY", DataType::Double));

    let t1 = TableDef::new("T1")
        .column(ColumnDef::new("a", DataType::Int))
        .column(ColumnDef::new("b", DataType::BigInt));

    catalog.create_table(emp).unwrap();
    catalog.create_table(t1).unwrap();
    catalog
}

/// `SELECT t1.a, t1.b AS bAlias FROM T1 t1`: a projection (id `first_id + 1`)
/// over a scan of T1 (id `first_id`)
pub fn aliased_subquery(first_id: PlanNodeId) -> PlanNode {
    let scan = PlanNode::new(first_id, SeqScanPlanNode::new("T1", "t1"));
    let columns = vec![
        SchemaColumn::new("T1", "t1", "a", None, Expr::column(Some("t1"), "a")),
        SchemaColumn::new(
            "T1",
            "t1",
            "b",
            Some("bAlias".to_string()),
            Expr::column(Some("t1"), "b"),
        ),
    ];
    PlanNode::new(first_id + 1, ProjectionPlanNode::new(scan, columns))
}
