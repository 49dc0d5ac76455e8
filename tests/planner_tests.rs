//! Plan node integration tests

use std::sync::Arc;

use plannode::catalog::{
    Catalog, CatalogError, ColumnDef, DataType, DatabaseEstimates, StatisticsProvider, TableDef,
    TableEstimates,
};
use plannode::expr::{BinaryOp, Expr, Literal};
use plannode::planner::{
    PlanCache, PlanCompiler, PlanNode, PlanNodeType, PlanOperator, PlannerConfig, PlannerError,
    ProjectionPlanNode, SchemaColumn, SeqScanPlanNode,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("plannode=debug")
        .with_test_writer()
        .try_init();
}

/// Create a test catalog with sample tables
fn test_catalog() -> Catalog {
    let mut catalog = Catalog::new();

    let orders = TableDef::new("ORDERS")
        .column(ColumnDef::new("ID", DataType::Int).nullable(false))
        .column(ColumnDef::new("CUSTOMER", DataType::Varchar(64)))
        .column(ColumnDef::new("TOTAL", DataType::Double))
        .column(ColumnDef::new("PLACED_AT", DataType::Timestamp));

    let t1 = TableDef::new("T1")
        .column(ColumnDef::new("a", DataType::Int))
        .column(ColumnDef::new("b", DataType::BigInt));

    catalog.create_table(orders).unwrap();
    catalog.create_table(t1).unwrap();

    catalog
}

fn test_estimates() -> DatabaseEstimates {
    DatabaseEstimates::new()
        .with_table("ORDERS", TableEstimates::exact(1000))
        .with_table(
            "T1",
            TableEstimates {
                min_tuples: 10,
                max_tuples: 40,
            },
        )
}

/// `(SELECT t1.a, t1.b AS bAlias FROM T1 t1) dt`
fn derived_table(predicate: Option<Expr>) -> PlanNode {
    let scan = PlanNode::new(1, SeqScanPlanNode::new("T1", "t1"));
    let projection = PlanNode::new(
        2,
        ProjectionPlanNode::new(
            scan,
            vec![
                SchemaColumn::new("T1", "t1", "a", None, Expr::column(Some("t1"), "a")),
                SchemaColumn::new(
                    "T1",
                    "t1",
                    "b",
                    Some("bAlias".to_string()),
                    Expr::column(Some("t1"), "b"),
                ),
            ],
        ),
    );
    let mut outer = SeqScanPlanNode::subquery("DT", "dt", projection);
    if let Some(p) = predicate {
        outer = outer.with_predicate(p);
    }
    PlanNode::new(3, outer)
}

// ============ Base table scans ============

#[test]
fn test_base_table_scan_end_to_end() {
    init_tracing();
    let catalog = test_catalog();
    let stats = test_estimates();

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "ORDERS")))
        .unwrap();

    let root = compiled.root();
    assert_eq!(root.plan_node_type(), PlanNodeType::SeqScan);
    assert_eq!(root.estimated_processed_tuple_count(), 1000);
    assert_eq!(root.estimated_output_tuple_count(), 1000);

    let table = catalog.get_table_ignore_case("orders").unwrap();
    let schema = compiled.output_schema().unwrap();
    let names: Vec<&str> = schema.columns().iter().map(|c| c.column_name.as_str()).collect();
    let catalog_names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, catalog_names);
    for column in schema.columns() {
        assert_eq!(column.table_name, "ORDERS");
        assert_eq!(column.table_alias, "ORDERS");
        assert!(column.column_alias.is_none());
    }
}

#[test]
fn test_scan_is_never_order_deterministic() {
    let catalog = test_catalog();
    let stats = test_estimates();

    let base = PlanCompiler::new(&catalog, &stats)
        .compile(PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "o")))
        .unwrap();
    let derived = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(None))
        .unwrap();

    assert!(!base.is_order_deterministic());
    assert!(!derived.is_order_deterministic());
}

#[test]
fn test_predicate_does_not_change_scan_estimate() {
    let catalog = test_catalog();
    let stats = test_estimates();
    let predicate = Expr::binary(
        Expr::column(Some("o"), "TOTAL"),
        BinaryOp::Gt,
        Expr::literal(Literal::Float(99.5)),
    );

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "o").with_predicate(predicate)))
        .unwrap();

    assert_eq!(compiled.estimated_output_tuples(), 1000);
    assert_eq!(
        compiled.explain(),
        Some("SEQUENTIAL SCAN of \"ORDERS\"\n filter by (o.TOTAL > 99.5)\n")
    );
}

#[test]
fn test_missing_table_is_reported() {
    let catalog = test_catalog();
    let stats = test_estimates();

    let err = PlanCompiler::new(&catalog, &stats)
        .compile(PlanNode::new(1, SeqScanPlanNode::new("NOPE", "n")))
        .unwrap_err();

    assert_eq!(
        err,
        PlannerError::Catalog(CatalogError::TableNotFound("NOPE".to_string()))
    );
}

// ============ Subquery scans ============

#[test]
fn test_subquery_scan_renames_child_columns() {
    init_tracing();
    let catalog = test_catalog();
    let stats = test_estimates();

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(None))
        .unwrap();

    let columns: Vec<(&str, &str, &str, Option<&str>)> = compiled
        .output_schema()
        .unwrap()
        .columns()
        .iter()
        .map(|c| {
            (
                c.table_name.as_str(),
                c.table_alias.as_str(),
                c.column_name.as_str(),
                c.column_alias.as_deref(),
            )
        })
        .collect();
    assert_eq!(
        columns,
        vec![("DT", "dt", "a", None), ("DT", "dt", "bAlias", None)]
    );

    // The child keeps its own schema untouched
    let child_schema = compiled.root().children()[0].output_schema().unwrap();
    assert_eq!(child_schema.columns()[1].column_name, "b");
    assert_eq!(child_schema.columns()[1].column_alias.as_deref(), Some("bAlias"));
}

#[test]
fn test_subquery_output_is_fully_resolved() {
    let catalog = test_catalog();
    let stats = test_estimates();

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(None))
        .unwrap();

    let schema = compiled.output_schema().unwrap();
    assert!(schema.columns().iter().all(|c| c.expression.is_resolved()));
    let indexes: Vec<Option<usize>> = schema
        .columns()
        .iter()
        .flat_map(|c| c.expression.column_refs())
        .map(|r| r.index)
        .collect();
    assert_eq!(indexes, vec![Some(0), Some(1)]);
}

#[test]
fn test_subquery_resolution_order_and_costs() {
    let catalog = test_catalog();
    let stats = test_estimates();
    let predicate = Expr::binary(
        Expr::column(Some("dt"), "bAlias"),
        BinaryOp::Lt,
        Expr::literal(Literal::Integer(5)),
    );

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(Some(predicate)))
        .unwrap();

    assert_eq!(compiled.resolution_order(), &[1, 2, 3]);

    let root = compiled.root();
    let projection = &root.children()[0];
    let inner_scan = &projection.children()[0];
    assert_eq!(inner_scan.estimated_output_tuple_count(), 40);
    assert_eq!(projection.estimated_output_tuple_count(), 40);
    // Subquery scans do not estimate their own cost
    assert_eq!(root.estimated_processed_tuple_count(), 0);
    assert_eq!(root.estimated_output_tuple_count(), 0);

    let PlanOperator::SeqScan(scan) = root.operator() else {
        panic!("Expected SeqScan");
    };
    assert!(scan.scan().is_subquery());
    assert_eq!(
        scan.scan().predicate(),
        Some(&Expr::binary(
            Expr::resolved_column(Some("dt"), "bAlias", 1),
            BinaryOp::Lt,
            Expr::literal(Literal::Integer(5)),
        ))
    );
}

#[test]
fn test_subquery_predicate_on_unknown_column_fails() {
    let catalog = test_catalog();
    let stats = test_estimates();
    // The derived table exposes the alias, not the underlying name
    let predicate = Expr::binary(
        Expr::column(Some("dt"), "b"),
        BinaryOp::Eq,
        Expr::literal(Literal::Integer(1)),
    );

    let err = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(Some(predicate)))
        .unwrap_err();
    assert_eq!(err, PlannerError::ColumnNotFound("dt.b".to_string()));
}

#[test]
fn test_subquery_explain() {
    let catalog = test_catalog();
    let stats = test_estimates();
    let predicate = Expr::binary(
        Expr::column(Some("dt"), "a"),
        BinaryOp::GtEq,
        Expr::literal(Literal::Integer(2)),
    );

    let compiled = PlanCompiler::new(&catalog, &stats)
        .compile(derived_table(Some(predicate)))
        .unwrap();

    assert_eq!(
        compiled.explain().unwrap(),
        concat!(
            "SEQUENTIAL SCAN of \"DT\"\n",
            " filter by (dt.a >= 2)\n",
            "  PROJECTION (a, b AS bAlias)\n",
            "    SEQUENTIAL SCAN of \"T1\"\n",
        )
    );
}

// ============ Statistics ============

struct FixedStats(u64);

impl StatisticsProvider for FixedStats {
    fn estimates_for_table(&self, _table: &str) -> TableEstimates {
        TableEstimates::exact(self.0)
    }
}

#[test]
fn test_custom_statistics_provider() {
    let catalog = test_catalog();
    let compiled = PlanCompiler::new(&catalog, &FixedStats(3))
        .compile(PlanNode::new(1, SeqScanPlanNode::new("orders", "o")))
        .unwrap();
    assert_eq!(compiled.estimated_output_tuples(), 3);
}

#[test]
fn test_compiler_default_covers_tables_without_statistics() {
    let catalog = test_catalog();
    let stats = DatabaseEstimates::new().with_table("ORDERS", TableEstimates::exact(1000));
    let compiler = PlanCompiler::new(&catalog, &stats)
        .with_config(PlannerConfig::new().with_default_max_tuples(77));

    let t1 = compiler
        .compile(PlanNode::new(1, SeqScanPlanNode::new("T1", "t1")))
        .unwrap();
    let orders = compiler
        .compile(PlanNode::new(1, SeqScanPlanNode::new("ORDERS", "o")))
        .unwrap();

    assert_eq!(t1.estimated_output_tuples(), 77);
    assert_eq!(orders.estimated_output_tuples(), 1000);
}

// ============ Plan cache ============

#[test]
fn test_plan_cache_shares_compiled_plans() {
    let catalog = test_catalog();
    let stats = test_estimates();
    let config = PlannerConfig::new().with_plan_cache_capacity(2);
    let cache = PlanCache::from_config(&config);
    let compiler = PlanCompiler::new(&catalog, &stats).with_config(config);

    let sql = "SELECT * FROM (SELECT t1.a, t1.b AS bAlias FROM T1 t1) dt";
    let first = cache
        .get_or_compile(sql, || compiler.compile(derived_table(None)))
        .unwrap();
    let second = cache
        .get_or_compile(sql, || compiler.compile(derived_table(None)))
        .unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.capacity(), 2);
}
