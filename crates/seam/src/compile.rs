//! Join-graph compilation: a base request plus joined associations become
//! one flat SELECT statement.

use indexmap::IndexMap;
use seam_sql::{Expr, Join, JoinKind, OrderTerm, Projection, RenderedSql, SelectStmt, TableExpr};
use tracing::debug;

use crate::alias::{self, AliasPreference};
use crate::association::Association;
use crate::request::{JoinRequirement, SelectRequest};
use crate::schema::SchemaCatalog;
use crate::{Error, Result};

/// One direct join in the linearized join tree. `node` is always a direct
/// variant; through chains are expanded before hops are recorded.
struct Hop<'a> {
    node: &'a Association,
    requirement: JoinRequirement,
    /// Occurrence index of the hop's left table: 0 is the base request,
    /// i + 1 is hop i.
    left: usize,
}

/// Linearize an association into direct hops: a through chain expands to
/// its pivot's hops followed by its continuation's, each continuing from
/// the occurrence the previous hop landed on. Returns the occurrence
/// index of the rightmost hop.
fn flatten<'a>(
    association: &'a Association,
    requirement: JoinRequirement,
    left: usize,
    hops: &mut Vec<Hop<'a>>,
) -> usize {
    match association {
        Association::Through {
            pivot,
            continuation,
        } => {
            let middle = flatten(pivot, requirement, left, hops);
            flatten(continuation, requirement, middle, hops)
        }
        direct => {
            hops.push(Hop {
                node: direct,
                requirement,
                left,
            });
            hops.len()
        }
    }
}

/// The identifier a request asks for, or the duplicate-alias error it
/// earned by asking twice.
fn preference(request: &SelectRequest) -> Result<AliasPreference> {
    match request.aliases.as_slice() {
        [] => Ok(AliasPreference::table_name(request.table.as_str())),
        [alias] => Ok(AliasPreference::explicit(alias.as_str())),
        [first, second, ..] => Err(Error::DuplicateAlias {
            table: request.table.clone(),
            first: first.clone(),
            second: second.clone(),
        }),
    }
}

/// An occurrence whose assigned identifier is the bare table name renders
/// without an alias clause.
fn table_expr(table: &str, assigned: &str) -> TableExpr {
    if assigned == table {
        TableExpr::named(table)
    } else {
        TableExpr::aliased(table, assigned)
    }
}

/// Rewrites an opaque expression for one table occurrence: bare columns
/// take that occurrence's identifier, reference-qualified columns follow
/// their reference's (possibly renamed) identifier.
fn qualify<'a>(
    renames: &'a IndexMap<String, String>,
    occurrence: &'a str,
) -> impl Fn(Option<&str>) -> Option<String> + 'a {
    move |current| match current {
        None => Some(occurrence.to_string()),
        Some(name) => Some(
            renames
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string()),
        ),
    }
}

impl SelectRequest {
    /// Compile this request and its joined associations into a single
    /// SELECT statement.
    ///
    /// Foreign keys resolve here, against `catalog`, never at declaration
    /// time; each hop resolves once per compilation. Association filters
    /// land in their hop's JOIN condition, the base request's filters in
    /// the outer WHERE, and only the base request's ordering is emitted.
    /// Compilation is all-or-nothing: any resolution failure aborts it.
    pub fn compile(&self, catalog: &impl SchemaCatalog) -> Result<SelectStmt> {
        let mut hops = Vec::new();
        for (association, requirement) in &self.joins {
            flatten(association, *requirement, 0, &mut hops);
        }

        let mut preferences = vec![preference(self)?];
        for hop in &hops {
            preferences.push(preference(hop.node.wrapped_request())?);
        }
        let allocation = alias::assign(&preferences);
        let assigned = &allocation.assigned;
        let renames = &allocation.renames;

        let mut stmt = SelectStmt::new()
            .project(Projection::star(assigned[0].clone()))
            .from(table_expr(&self.table, &assigned[0]));

        for (i, hop) in hops.iter().enumerate() {
            let request = hop.node.wrapped_request();
            let hop_alias = assigned[i + 1].as_str();
            let left_alias = assigned[hop.left].as_str();

            // Equality pairs first, then the hop's own filters, one flat
            // conjunction. The mapping is never empty, so neither is it.
            let pairs = hop.node.mapping(catalog)?;
            let on = Expr::all(
                pairs
                    .iter()
                    .map(|(left_col, right_col)| {
                        Expr::qualified(hop_alias, right_col.as_str())
                            .eq(Expr::qualified(left_alias, left_col.as_str()))
                    })
                    .chain(request.filters.iter().map(|filter| {
                        filter.clone().map_qualifiers(&qualify(renames, hop_alias))
                    })),
            );
            if !request.order.is_empty() {
                debug!(
                    table = %request.table,
                    "association ordering is not part of the compiled statement"
                );
            }

            stmt = stmt.join(Join {
                kind: match hop.requirement {
                    JoinRequirement::Required => JoinKind::Inner,
                    JoinRequirement::Optional => JoinKind::Left,
                },
                target: table_expr(&request.table, hop_alias),
                on,
            });
        }

        for filter in &self.filters {
            stmt = stmt.and_where(
                filter
                    .clone()
                    .map_qualifiers(&qualify(renames, &assigned[0])),
            );
        }
        for term in &self.order {
            stmt = stmt.order_by(OrderTerm {
                expr: term
                    .expr
                    .clone()
                    .map_qualifiers(&qualify(renames, &assigned[0])),
                descending: term.descending,
            });
        }

        Ok(stmt)
    }

    /// Compile and render to SQL.
    pub fn compile_sql(&self, catalog: &impl SchemaCatalog) -> Result<RenderedSql> {
        let stmt = self.compile(catalog)?;
        let rendered = seam_sql::render(&stmt);
        debug!(sql = %rendered.sql, "compiled join query");
        Ok(rendered)
    }
}
