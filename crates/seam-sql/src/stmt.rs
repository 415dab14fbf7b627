//! SELECT statements.

use crate::expr::Expr;

/// A SELECT statement: the only statement shape this crate builds. The
/// query layers above it read, they never write.
#[derive(Debug, Clone, Default)]
pub struct SelectStmt {
    pub projections: Vec<Projection>,
    pub from: Option<TableExpr>,
    pub joins: Vec<Join>,
    pub where_clause: Option<Expr>,
    pub order_by: Vec<OrderTerm>,
}

/// One item of the SELECT list.
#[derive(Debug, Clone)]
pub enum Projection {
    /// table.*
    Star(String),
    Expr { expr: Expr, alias: Option<String> },
}

impl Projection {
    /// Every column of one table occurrence: `identifier.*`
    pub fn star(identifier: impl Into<String>) -> Self {
        Projection::Star(identifier.into())
    }

    pub fn expr(expr: Expr) -> Self {
        Projection::Expr { expr, alias: None }
    }

    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Projection::Expr {
            expr,
            alias: Some(alias.into()),
        }
    }
}

/// A table occurrence in FROM or JOIN position, with the identifier it
/// goes by when that differs from the table name.
#[derive(Debug, Clone)]
pub struct TableExpr {
    pub table: String,
    pub alias: Option<String>,
}

impl TableExpr {
    pub fn named(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
        }
    }

    pub fn aliased(table: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: Some(alias.into()),
        }
    }
}

/// A JOIN clause.
#[derive(Debug, Clone)]
pub struct Join {
    pub kind: JoinKind,
    pub target: TableExpr,
    pub on: Expr,
}

/// Inner joins drop rows with no match; left joins keep them, with NULL
/// related columns. Inner renders as plain `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JoinKind::Inner => "JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

/// One ORDER BY term.
#[derive(Debug, Clone)]
pub struct OrderTerm {
    pub expr: Expr,
    pub descending: bool,
}

impl OrderTerm {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            descending: false,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            descending: true,
        }
    }
}

impl SelectStmt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projections.push(projection);
        self
    }

    pub fn from(mut self, target: TableExpr) -> Self {
        self.from = Some(target);
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// AND the expression onto the WHERE clause.
    pub fn and_where(mut self, expr: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(expr),
            None => expr,
        });
        self
    }

    pub fn order_by(mut self, term: OrderTerm) -> Self {
        self.order_by.push(term);
        self
    }
}
