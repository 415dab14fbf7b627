//! SQL expressions.
//!
//! The query layers built on top of this crate treat expressions as
//! opaque values: they conjoin them with [`Expr::all`] and rewrite their
//! table qualifiers with [`Expr::map_qualifiers`], but never interpret
//! their internal shape.

/// A column, optionally qualified by a table identifier.
///
/// The qualifier is whatever identifier the table occurrence goes by in
/// the surrounding statement, not necessarily the table's name.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

/// A SQL value literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Text(String),
    Int(i64),
    Bool(bool),
    Null,
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "<>",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// A SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Column(ColumnRef),
    Literal(Literal),
    /// A named parameter placeholder (e.g. $code -> $1)
    Param(String),
    /// A comparison between two operands.
    Cmp {
        op: CmpOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Conjunction. Empty renders as TRUE.
    All(Vec<Expr>),
    /// Disjunction. Empty renders as FALSE.
    Any(Vec<Expr>),
    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },
    /// Raw SQL (escape hatch)
    Raw(String),
}

impl Expr {
    pub fn column(name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef {
            qualifier: None,
            name: name.into(),
        })
    }

    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Expr::Column(ColumnRef {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        })
    }

    pub fn text(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::Text(s.into()))
    }

    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Int(n))
    }

    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    pub fn null() -> Self {
        Expr::Literal(Literal::Null)
    }

    pub fn param(name: impl Into<String>) -> Self {
        Expr::Param(name.into())
    }

    pub fn raw(sql: impl Into<String>) -> Self {
        Expr::Raw(sql.into())
    }

    fn cmp(self, op: CmpOp, rhs: Expr) -> Self {
        Expr::Cmp {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    /// self = other
    pub fn eq(self, other: Expr) -> Self {
        self.cmp(CmpOp::Eq, other)
    }

    /// self <> other
    pub fn ne(self, other: Expr) -> Self {
        self.cmp(CmpOp::Ne, other)
    }

    pub fn lt(self, other: Expr) -> Self {
        self.cmp(CmpOp::Lt, other)
    }

    pub fn le(self, other: Expr) -> Self {
        self.cmp(CmpOp::Le, other)
    }

    pub fn gt(self, other: Expr) -> Self {
        self.cmp(CmpOp::Gt, other)
    }

    pub fn ge(self, other: Expr) -> Self {
        self.cmp(CmpOp::Ge, other)
    }

    /// self AND other. Chained calls accumulate into one flat
    /// conjunction rather than nesting.
    pub fn and(self, other: Expr) -> Self {
        match self {
            Expr::All(mut items) => {
                items.push(other);
                Expr::All(items)
            }
            first => Expr::All(vec![first, other]),
        }
    }

    /// self OR other. Chained calls accumulate into one flat disjunction.
    pub fn or(self, other: Expr) -> Self {
        match self {
            Expr::Any(mut items) => {
                items.push(other);
                Expr::Any(items)
            }
            first => Expr::Any(vec![first, other]),
        }
    }

    /// Conjunction of any number of expressions. A single conjunct stays
    /// as itself.
    pub fn all(items: impl IntoIterator<Item = Expr>) -> Self {
        let mut items: Vec<Expr> = items.into_iter().collect();
        if items.len() == 1 {
            items.pop().unwrap()
        } else {
            Expr::All(items)
        }
    }

    pub fn is_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Self {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// Rewrite table qualifiers throughout the expression.
    ///
    /// The callback receives each column's current qualifier (`None` for
    /// a bare column) and returns the qualifier to use instead. Literals,
    /// parameters, and raw fragments pass through untouched.
    pub fn map_qualifiers(self, f: &impl Fn(Option<&str>) -> Option<String>) -> Expr {
        match self {
            Expr::Column(col) => Expr::Column(ColumnRef {
                qualifier: f(col.qualifier.as_deref()),
                name: col.name,
            }),
            Expr::Cmp { op, lhs, rhs } => Expr::Cmp {
                op,
                lhs: Box::new(lhs.map_qualifiers(f)),
                rhs: Box::new(rhs.map_qualifiers(f)),
            },
            Expr::All(items) => {
                Expr::All(items.into_iter().map(|e| e.map_qualifiers(f)).collect())
            }
            Expr::Any(items) => {
                Expr::Any(items.into_iter().map(|e| e.map_qualifiers(f)).collect())
            }
            Expr::IsNull { expr, negated } => Expr::IsNull {
                expr: Box::new(expr.map_qualifiers(f)),
                negated,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_builds_a_flat_conjunction() {
        let expr = Expr::column("a")
            .is_null()
            .and(Expr::column("b").is_null())
            .and(Expr::column("c").is_null());

        let Expr::All(items) = expr else {
            panic!("expected conjunction");
        };
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_all_collapses_a_single_conjunct() {
        let only = Expr::column("x").eq(Expr::int(1));
        assert_eq!(Expr::all([only.clone()]), only);
    }

    #[test]
    fn test_map_qualifiers_qualifies_bare_columns() {
        let expr = Expr::column("code")
            .ne(Expr::text("DE"))
            .and(Expr::qualified("a", "name").is_null());

        let mapped = expr.map_qualifiers(&|qualifier| match qualifier {
            None => Some("countries".to_string()),
            Some(q) => Some(q.to_string()),
        });

        assert_eq!(
            mapped,
            Expr::qualified("countries", "code")
                .ne(Expr::text("DE"))
                .and(Expr::qualified("a", "name").is_null())
        );
    }

    #[test]
    fn test_map_qualifiers_leaves_literals_alone() {
        let expr = Expr::text("x").eq(Expr::param("p"));
        let mapped = expr.clone().map_qualifiers(&|_| Some("t".to_string()));
        assert_eq!(mapped, expr);
    }
}
