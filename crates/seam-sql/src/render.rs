//! Rendering the AST to SQL text.

use indexmap::IndexMap;

use crate::expr::{ColumnRef, Expr, Literal};
use crate::stmt::{Projection, SelectStmt, TableExpr};
use crate::{RenderedSql, quote_ident, quote_literal};

/// Accumulates SQL text and numbers named parameters on first use, so the
/// same name used twice becomes one `$N` placeholder.
pub struct Renderer {
    sql: String,
    /// Parameter name -> placeholder index, in first-use order.
    params: IndexMap<String, usize>,
    /// One clause per line instead of one long line.
    pretty: bool,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            sql: String::new(),
            params: IndexMap::new(),
            pretty: false,
        }
    }

    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::new()
        }
    }

    fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    /// Separator before a top-level clause (FROM, JOIN, WHERE, ...).
    fn clause(&mut self) {
        self.sql.push(if self.pretty { '\n' } else { ' ' });
    }

    fn placeholder(&mut self, name: &str) -> String {
        let next = self.params.len() + 1;
        let idx = *self.params.entry(name.to_string()).or_insert(next);
        format!("${idx}")
    }

    pub fn finish(self) -> RenderedSql {
        RenderedSql {
            sql: self.sql,
            params: self.params.into_keys().collect(),
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Types that can write themselves as SQL.
pub trait Render {
    fn render(&self, out: &mut Renderer);
}

/// Render with compact formatting.
pub fn render(stmt: &impl Render) -> RenderedSql {
    let mut out = Renderer::new();
    stmt.render(&mut out);
    out.finish()
}

/// Render with one clause per line.
pub fn render_pretty(stmt: &impl Render) -> RenderedSql {
    let mut out = Renderer::pretty();
    stmt.render(&mut out);
    out.finish()
}

impl Expr {
    /// Render as an operand of a comparison, parenthesizing the boolean
    /// combinators.
    fn render_operand(&self, out: &mut Renderer) {
        match self {
            Expr::All(items) | Expr::Any(items) if items.len() > 1 => {
                out.push("(");
                self.render(out);
                out.push(")");
            }
            _ => self.render(out),
        }
    }

    /// Render as one conjunct of an AND chain. AND binds tighter than OR,
    /// so only disjunctions need parentheses here.
    fn render_conjunct(&self, out: &mut Renderer) {
        match self {
            Expr::Any(items) if items.len() > 1 => {
                out.push("(");
                self.render(out);
                out.push(")");
            }
            _ => self.render(out),
        }
    }
}

impl Render for Expr {
    fn render(&self, out: &mut Renderer) {
        match self {
            Expr::Column(col) => col.render(out),
            Expr::Literal(lit) => lit.render(out),
            Expr::Param(name) => {
                let placeholder = out.placeholder(name);
                out.push(&placeholder);
            }
            Expr::Cmp { op, lhs, rhs } => {
                lhs.render_operand(out);
                out.push(" ");
                out.push(op.as_str());
                out.push(" ");
                rhs.render_operand(out);
            }
            Expr::All(items) if items.is_empty() => out.push("TRUE"),
            Expr::All(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(" AND ");
                    }
                    item.render_conjunct(out);
                }
            }
            Expr::Any(items) if items.is_empty() => out.push("FALSE"),
            Expr::Any(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(" OR ");
                    }
                    item.render(out);
                }
            }
            Expr::IsNull { expr, negated } => {
                expr.render(out);
                out.push(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::Raw(sql) => out.push(sql),
        }
    }
}

impl Render for ColumnRef {
    fn render(&self, out: &mut Renderer) {
        if let Some(qualifier) = &self.qualifier {
            out.push(&quote_ident(qualifier));
            out.push(".");
        }
        out.push(&quote_ident(&self.name));
    }
}

impl Render for Literal {
    fn render(&self, out: &mut Renderer) {
        match self {
            Literal::Text(s) => out.push(&quote_literal(s)),
            Literal::Int(n) => out.push(&n.to_string()),
            Literal::Bool(b) => out.push(if *b { "TRUE" } else { "FALSE" }),
            Literal::Null => out.push("NULL"),
        }
    }
}

impl Render for TableExpr {
    fn render(&self, out: &mut Renderer) {
        out.push(&quote_ident(&self.table));
        if let Some(alias) = &self.alias {
            out.push(" ");
            out.push(&quote_ident(alias));
        }
    }
}

impl Render for Projection {
    fn render(&self, out: &mut Renderer) {
        match self {
            Projection::Star(identifier) => {
                out.push(&quote_ident(identifier));
                out.push(".*");
            }
            Projection::Expr { expr, alias } => {
                expr.render(out);
                if let Some(alias) = alias {
                    out.push(" AS ");
                    out.push(&quote_ident(alias));
                }
            }
        }
    }
}

impl Render for SelectStmt {
    fn render(&self, out: &mut Renderer) {
        out.push("SELECT");
        if self.projections.is_empty() {
            out.push(" *");
        } else {
            for (i, projection) in self.projections.iter().enumerate() {
                out.push(if i == 0 { " " } else { ", " });
                projection.render(out);
            }
        }

        if let Some(from) = &self.from {
            out.clause();
            out.push("FROM ");
            from.render(out);
        }

        for join in &self.joins {
            out.clause();
            out.push(join.kind.as_str());
            out.push(" ");
            join.target.render(out);
            out.push(" ON ");
            join.on.render(out);
        }

        if let Some(where_clause) = &self.where_clause {
            out.clause();
            out.push("WHERE ");
            where_clause.render(out);
        }

        if !self.order_by.is_empty() {
            out.clause();
            out.push("ORDER BY ");
            for (i, term) in self.order_by.iter().enumerate() {
                if i > 0 {
                    out.push(", ");
                }
                term.expr.render(out);
                if term.descending {
                    out.push(" DESC");
                }
            }
        }
    }
}
