//! Requests: the aliasable, filterable unit the join compiler works on.

use seam_sql::{Expr, OrderTerm};

use crate::association::{Association, RequestDerivable};

/// A handle for one occurrence of a table within a request.
///
/// Distinct occurrences of the same base table (as in a self-join) are
/// told apart by the identifiers the compiler assigns, not by table name.
/// An explicit reference pins the preferred identifier and lets other
/// parts of the query address this occurrence via [`TableReference::column`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableReference {
    alias: String,
}

impl TableReference {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
        }
    }

    /// The requested identifier.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// A column expression qualified by this reference.
    ///
    /// If the identifier is renamed during compilation, the qualifier is
    /// rewritten along with it.
    pub fn column(&self, name: impl Into<String>) -> Expr {
        Expr::qualified(self.alias.as_str(), name)
    }
}

/// Whether a joined association must match.
///
/// Required joins exclude base rows with no matching related row;
/// optional joins keep them, with NULL related columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinRequirement {
    Required,
    Optional,
}

/// A request for rows of one table, carrying its accumulated refinements
/// and the associations joined onto it.
///
/// Requests are plain immutable values: they hold no database handle, and
/// the same request can be compiled any number of times, against different
/// catalogs. Filters and orderings accumulate into the request's own lists
/// (never query-of-query nesting), so the order in which refinements are
/// applied does not affect the compiled statement.
#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub(crate) table: String,
    /// Explicit aliases in application order. More than one entry is a
    /// caller error, reported at compile time.
    pub(crate) aliases: Vec<String>,
    pub(crate) filters: Vec<Expr>,
    pub(crate) order: Vec<OrderTerm>,
    pub(crate) joins: Vec<(Association, JoinRequirement)>,
}

impl SelectRequest {
    /// A request for every row of `table`.
    pub fn all(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            aliases: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            joins: Vec::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Add a filter condition. On the base request this lands in the
    /// outer WHERE clause.
    pub fn filter(mut self, expr: Expr) -> Self {
        self.filters.push(expr);
        self
    }

    /// Add an ORDER BY term. Only the base request's ordering reaches the
    /// compiled statement.
    pub fn order_by(mut self, order: OrderTerm) -> Self {
        self.order.push(order);
        self
    }

    /// Bind this request to an explicit table reference.
    ///
    /// Binding the same request to two references is ambiguous and is
    /// reported as [`Error::DuplicateAlias`] at compile time.
    ///
    /// [`Error::DuplicateAlias`]: crate::Error::DuplicateAlias
    pub fn referenced_by(mut self, reference: &TableReference) -> Self {
        self.aliases.push(reference.alias().to_string());
        self
    }

    /// Join an association; base rows without a match are excluded.
    pub fn joining_required(mut self, association: Association) -> Self {
        self.joins.push((association, JoinRequirement::Required));
        self
    }

    /// Join an association; base rows without a match are kept.
    pub fn joining_optional(mut self, association: Association) -> Self {
        self.joins.push((association, JoinRequirement::Optional));
        self
    }
}

impl RequestDerivable for SelectRequest {
    fn map_request(self, f: impl FnOnce(SelectRequest) -> SelectRequest) -> Self {
        f(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refinements_accumulate() {
        let request = SelectRequest::all("countries")
            .filter(Expr::column("code").ne(Expr::text("DE")))
            .order_by(OrderTerm::desc(Expr::column("name")))
            .filter(Expr::column("name").is_not_null());

        assert_eq!(request.filters.len(), 2);
        assert_eq!(request.order.len(), 1);
    }

    #[test]
    fn test_reference_column_is_qualified() {
        let reference = TableReference::new("c");
        assert_eq!(reference.column("code"), Expr::qualified("c", "code"));
    }
}
