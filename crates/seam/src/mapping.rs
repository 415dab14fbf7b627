//! Foreign-key resolution: from a declared table pair to concrete column
//! pairs.

use crate::schema::SchemaCatalog;
use crate::{Error, Result};

/// Which columns tie the origin table to the destination table.
#[derive(Debug, Clone, PartialEq)]
enum ColumnSpec {
    /// Look the foreign key up in the schema catalog.
    Infer,
    /// Explicit origin columns, paired with the destination primary key.
    Origin(Vec<String>),
    /// Both sides explicit, paired positionally.
    Explicit {
        origin: Vec<String>,
        destination: Vec<String>,
    },
}

/// An unresolved join descriptor between two tables.
///
/// Associations are declared before any schema needs to exist, so this
/// carries table names and optional explicit columns only. [`resolve`]
/// turns it into a concrete [`JoinMapping`] during compilation, against
/// the catalog in effect then.
///
/// [`resolve`]: ForeignKeyRequest::resolve
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKeyRequest {
    origin_table: String,
    destination_table: String,
    columns: ColumnSpec,
}

impl ForeignKeyRequest {
    /// A request that infers its columns from the catalog.
    pub fn new(origin_table: impl Into<String>, destination_table: impl Into<String>) -> Self {
        Self {
            origin_table: origin_table.into(),
            destination_table: destination_table.into(),
            columns: ColumnSpec::Infer,
        }
    }

    /// Fix the origin-side columns; the destination side will be the
    /// destination table's primary key.
    pub fn origin_columns(mut self, cols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.columns = ColumnSpec::Origin(cols.into_iter().map(Into::into).collect());
        self
    }

    /// Fix both sides, paired positionally.
    pub fn explicit_columns(
        mut self,
        origin: impl IntoIterator<Item = impl Into<String>>,
        destination: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.columns = ColumnSpec::Explicit {
            origin: origin.into_iter().map(Into::into).collect(),
            destination: destination.into_iter().map(Into::into).collect(),
        };
        self
    }

    /// The table the foreign key lives on.
    pub fn origin_table(&self) -> &str {
        &self.origin_table
    }

    /// The table the foreign key points at.
    pub fn destination_table(&self) -> &str {
        &self.destination_table
    }

    /// Resolve to a concrete column mapping.
    ///
    /// Explicit columns are used verbatim, without any catalog lookup.
    /// Otherwise exactly one foreign key from origin to destination must
    /// exist in the catalog: zero is a missing relationship, more than one
    /// is ambiguous and needs explicit columns.
    pub fn resolve(&self, catalog: &impl SchemaCatalog) -> Result<JoinMapping> {
        let pairs = match &self.columns {
            ColumnSpec::Explicit {
                origin,
                destination,
            } => self.pair(origin.clone(), destination.clone())?,
            ColumnSpec::Origin(origin) => {
                let destination = catalog.primary_key(&self.destination_table)?;
                self.pair(origin.clone(), destination)?
            }
            ColumnSpec::Infer => {
                let mut matching: Vec<_> = catalog
                    .foreign_keys(&self.origin_table)?
                    .into_iter()
                    .filter(|fk| fk.references_table == self.destination_table)
                    .collect();
                match matching.len() {
                    0 => {
                        return Err(Error::MissingForeignKey {
                            origin: self.origin_table.clone(),
                            destination: self.destination_table.clone(),
                        });
                    }
                    1 => {
                        let fk = matching.remove(0);
                        self.pair(fk.columns, fk.references_columns)?
                    }
                    _ => {
                        return Err(Error::AmbiguousForeignKey {
                            origin: self.origin_table.clone(),
                            destination: self.destination_table.clone(),
                        });
                    }
                }
            }
        };

        Ok(JoinMapping {
            origin_table: self.origin_table.clone(),
            destination_table: self.destination_table.clone(),
            pairs,
        })
    }

    fn pair(
        &self,
        origin: Vec<String>,
        destination: Vec<String>,
    ) -> Result<Vec<(String, String)>> {
        if origin.is_empty() || origin.len() != destination.len() {
            return Err(Error::ColumnCountMismatch {
                origin: self.origin_table.clone(),
                origin_count: origin.len(),
                destination: self.destination_table.clone(),
                destination_count: destination.len(),
            });
        }
        Ok(origin.into_iter().zip(destination).collect())
    }
}

/// The canonical, resolved join condition between two tables.
///
/// Immutable once resolved. Pair order defines the AND-ed equality
/// predicates of the join condition, evaluated positionally.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinMapping {
    pub origin_table: String,
    pub destination_table: String,
    /// Positional (origin column, destination column) pairs.
    pub pairs: Vec<(String, String)>,
}
