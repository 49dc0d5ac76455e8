//! Scalar expressions referenced by plan nodes
//!
//! Plan nodes use expressions as predicates and as the producers of output
//! columns. The planner needs three things from them: an independent deep
//! copy (`Clone`), EXPLAIN text, and resolution of column references to
//! positions in an input schema.

use std::fmt;

use crate::planner::error::PlannerResult;
use crate::planner::schema::NodeSchema;

/// Literal value
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Null => write!(f, "NULL"),
            Literal::Boolean(true) => write!(f, "TRUE"),
            Literal::Boolean(false) => write!(f, "FALSE"),
            Literal::Integer(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", v),
            Literal::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    // Logical
    And,
    Or,
    // String
    Like,
}

impl BinaryOp {
    /// SQL spelling of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "=",
            BinaryOp::NotEq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Like => "LIKE",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Column reference, symbolic until resolved against an input schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Table name or alias qualifying the reference
    pub table: Option<String>,
    /// Column name or alias
    pub name: String,
    /// Position in the input schema, set by column resolution
    pub index: Option<usize>,
}

/// Scalar expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column reference
    Column(ColumnRef),
    /// Literal value
    Literal(Literal),
    /// Binary operation
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Unary operation
    UnaryOp { op: UnaryOp, expr: Box<Expr> },
    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },
    /// IN (list)
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    /// BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
}

impl Expr {
    /// Unresolved column reference
    pub fn column(table: Option<&str>, name: &str) -> Self {
        Expr::Column(ColumnRef {
            table: table.map(str::to_string),
            name: name.to_string(),
            index: None,
        })
    }

    /// Column reference already bound to a position
    pub fn resolved_column(table: Option<&str>, name: &str, index: usize) -> Self {
        Expr::Column(ColumnRef {
            table: table.map(str::to_string),
            name: name.to_string(),
            index: Some(index),
        })
    }

    /// Literal value
    pub fn literal(value: Literal) -> Self {
        Expr::Literal(value)
    }

    /// Binary operation
    pub fn binary(left: Expr, op: BinaryOp, right: Expr) -> Self {
        Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Conjunction of two predicates
    pub fn and(self, other: Expr) -> Self {
        Expr::binary(self, BinaryOp::And, other)
    }

    /// EXPLAIN rendering of this expression
    pub fn explain(&self) -> String {
        match self {
            Expr::Column(col) => match &col.table {
                Some(t) => format!("{}.{}", t, col.name),
                None => col.name.clone(),
            },
            Expr::Literal(lit) => lit.to_string(),
            Expr::BinaryOp { left, op, right } => {
                format!("({} {} {})", left.explain(), op.symbol(), right.explain())
            }
            Expr::UnaryOp { op, expr } => match op {
                UnaryOp::Not => format!("NOT {}", expr.explain()),
                UnaryOp::Neg => format!("-{}", expr.explain()),
            },
            Expr::IsNull { expr, negated } => {
                let not = if *negated { " NOT" } else { "" };
                format!("({} IS{} NULL)", expr.explain(), not)
            }
            Expr::InList {
                expr,
                list,
                negated,
            } => {
                let items: Vec<String> = list.iter().map(Expr::explain).collect();
                let not = if *negated { " NOT" } else { "" };
                format!("({}{} IN ({}))", expr.explain(), not, items.join(", "))
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let not = if *negated { " NOT" } else { "" };
                format!(
                    "({}{} BETWEEN {} AND {})",
                    expr.explain(),
                    not,
                    low.explain(),
                    high.explain()
                )
            }
        }
    }

    /// Bind every column reference to its position in `schema`
    pub fn resolve_columns(&mut self, schema: &NodeSchema) -> PlannerResult<()> {
        match self {
            Expr::Column(col) => {
                col.index = Some(schema.index_of(col.table.as_deref(), &col.name)?);
                Ok(())
            }
            Expr::Literal(_) => Ok(()),
            Expr::BinaryOp { left, right, .. } => {
                left.resolve_columns(schema)?;
                right.resolve_columns(schema)
            }
            Expr::UnaryOp { expr, .. } | Expr::IsNull { expr, .. } => {
                expr.resolve_columns(schema)
            }
            Expr::InList { expr, list, .. } => {
                expr.resolve_columns(schema)?;
                list.iter_mut().try_for_each(|e| e.resolve_columns(schema))
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.resolve_columns(schema)?;
                low.resolve_columns(schema)?;
                high.resolve_columns(schema)
            }
        }
    }

    /// All column references, in left-to-right order
    pub fn column_refs(&self) -> Vec<&ColumnRef> {
        let mut refs = Vec::new();
        self.collect_column_refs(&mut refs);
        refs
    }

    fn collect_column_refs<'a>(&'a self, out: &mut Vec<&'a ColumnRef>) {
        match self {
            Expr::Column(col) => out.push(col),
            Expr::Literal(_) => {}
            Expr::BinaryOp { left, right, .. } => {
                left.collect_column_refs(out);
                right.collect_column_refs(out);
            }
            Expr::UnaryOp { expr, .. } | Expr::IsNull { expr, .. } => {
                expr.collect_column_refs(out)
            }
            Expr::InList { expr, list, .. } => {
                expr.collect_column_refs(out);
                for e in list {
                    e.collect_column_refs(out);
                }
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.collect_column_refs(out);
                low.collect_column_refs(out);
                high.collect_column_refs(out);
            }
        }
    }

    /// Whether every column reference has been bound to a position
    pub fn is_resolved(&self) -> bool {
        self.column_refs().iter().all(|c| c.index.is_some())
    }
}
