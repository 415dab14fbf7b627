//! Schema catalog: the table and foreign-key metadata join resolution
//! consults.
//!
//! The compiler only ever reads the catalog through [`SchemaCatalog`], a
//! deliberately narrow interface. [`Schema`] is the in-memory
//! implementation; anything that can answer "which foreign keys leave this
//! table" and "what is this table's primary key" can stand in for it.

use crate::{Error, Result};

/// A declared foreign key.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Columns on the declaring table.
    pub columns: Vec<String>,
    /// Table the key points at.
    pub references_table: String,
    /// Columns in the referenced table, paired positionally with
    /// `columns`.
    pub references_columns: Vec<String>,
}

/// A table declaration.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    /// Primary key column names, in declaration order.
    pub primary_key: Vec<String>,
    /// Foreign keys declared on this table, in declaration order.
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare the table's columns.
    pub fn columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the primary key.
    pub fn primary_key(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.primary_key = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Declare a foreign key from columns of this table to columns of
    /// another (possibly this same) table.
    pub fn foreign_key(
        mut self,
        columns: impl IntoIterator<Item = impl Into<String>>,
        references_table: impl Into<String>,
        references_columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            columns: columns.into_iter().map(Into::into).collect(),
            references_table: references_table.into(),
            references_columns: references_columns.into_iter().map(Into::into).collect(),
        });
        self
    }
}

/// An in-memory schema: the declared tables, nothing else.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table declaration.
    pub fn table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    fn find(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| Error::UnknownTable(name.to_string()))
    }
}

/// The narrow read interface join resolution consumes.
///
/// Both methods must answer without further coordination: callers invoke
/// compilation under whatever transaction discipline the surrounding
/// data-access layer already enforces.
pub trait SchemaCatalog {
    /// Foreign keys declared on `table`, in declaration order.
    fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>>;

    /// Primary key columns of `table`, in declaration order.
    fn primary_key(&self, table: &str) -> Result<Vec<String>>;
}

impl SchemaCatalog for Schema {
    fn foreign_keys(&self, table: &str) -> Result<Vec<ForeignKey>> {
        Ok(self.find(table)?.foreign_keys.clone())
    }

    fn primary_key(&self, table: &str) -> Result<Vec<String>> {
        Ok(self.find(table)?.primary_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_table() {
        let schema = Schema::new().table(Table::new("users"));
        let err = schema.foreign_keys("ghosts").unwrap_err();
        assert!(matches!(err, Error::UnknownTable(name) if name == "ghosts"));
    }

    #[test]
    fn test_foreign_keys_keep_declaration_order() {
        let schema = Schema::new().table(
            Table::new("persons")
                .columns(["id", "parentId", "childId"])
                .primary_key(["id"])
                .foreign_key(["parentId"], "persons", ["id"])
                .foreign_key(["childId"], "persons", ["id"]),
        );

        let fks = schema.foreign_keys("persons").unwrap();
        assert_eq!(fks.len(), 2);
        assert_eq!(fks[0].columns, vec!["parentId"]);
        assert_eq!(fks[1].columns, vec!["childId"]);
    }
}
