//! Associations: declared, unexecuted relationships between table kinds.
//!
//! An [`Association`] is a plain value. It holds table names, an
//! unresolved foreign-key descriptor, and the right-hand request carrying
//! any refinements; it never touches a schema until compiled. Values can
//! be cloned, stored, composed into [through chains](Association::through),
//! and reused across compilations.

use seam_sql::{Expr, OrderTerm};

use crate::mapping::ForeignKeyRequest;
use crate::request::{SelectRequest, TableReference};
use crate::schema::SchemaCatalog;
use crate::{Error, Result};

/// How many related rows an association can produce per base row.
///
/// Downstream result-grouping logic keys off this; the compiler itself
/// only reads it through [`JoinRequirement`](crate::JoinRequirement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    ToOne,
    ToMany,
}

/// Shared payload of the direct association variants: the lazy
/// foreign-key descriptor plus the right-hand request.
#[derive(Debug, Clone)]
pub struct DirectAssociation {
    pub(crate) fk: ForeignKeyRequest,
    pub(crate) request: SelectRequest,
}

/// A relationship between a left (origin) and right (destination) table
/// kind.
#[derive(Debug, Clone)]
pub enum Association {
    /// The foreign key lives on the left table, pointing at the right.
    BelongsTo(DirectAssociation),
    /// The foreign key lives on the right table, pointing back at the
    /// left; at most one related row.
    HasOne(DirectAssociation),
    /// The foreign key lives on the right table, pointing back at the
    /// left; any number of related rows.
    HasMany(DirectAssociation),
    /// A pivot hop composed with a continuation hop.
    Through {
        pivot: Box<Association>,
        continuation: Box<Association>,
    },
}

/// Declare that `left` owns a foreign key pointing at `right`.
pub fn belongs_to(left: impl Into<String>, right: impl Into<String>) -> Association {
    let right = right.into();
    Association::BelongsTo(DirectAssociation {
        fk: ForeignKeyRequest::new(left, right.clone()),
        request: SelectRequest::all(right),
    })
}

/// Declare that `right` owns a foreign key pointing back at `left`, with
/// at most one related row per `left` row.
pub fn has_one(left: impl Into<String>, right: impl Into<String>) -> Association {
    let right = right.into();
    Association::HasOne(DirectAssociation {
        fk: ForeignKeyRequest::new(right.clone(), left),
        request: SelectRequest::all(right),
    })
}

/// Declare that `right` owns a foreign key pointing back at `left`, with
/// any number of related rows per `left` row.
pub fn has_many(left: impl Into<String>, right: impl Into<String>) -> Association {
    let right = right.into();
    Association::HasMany(DirectAssociation {
        fk: ForeignKeyRequest::new(right.clone(), left),
        request: SelectRequest::all(right),
    })
}

impl Association {
    /// Compose a pivot hop with a continuation hop.
    ///
    /// The chain must connect: the pivot's right table is the
    /// continuation's left table. A broken chain is rejected here, at
    /// construction, not during compilation. Chains nest to arbitrary
    /// depth (the continuation may itself be a through chain) and may be
    /// self-referential.
    pub fn through(pivot: Association, continuation: Association) -> Result<Association> {
        if pivot.right_table() != continuation.left_table() {
            return Err(Error::ThroughChainMismatch {
                pivot_right: pivot.right_table().to_string(),
                continuation_left: continuation.left_table().to_string(),
            });
        }
        Ok(Association::Through {
            pivot: Box::new(pivot),
            continuation: Box::new(continuation),
        })
    }

    /// Table on the near side of the relationship.
    pub fn left_table(&self) -> &str {
        match self {
            Association::BelongsTo(d) => d.fk.origin_table(),
            Association::HasOne(d) | Association::HasMany(d) => d.fk.destination_table(),
            Association::Through { pivot, .. } => pivot.left_table(),
        }
    }

    /// Table the relationship lands on.
    pub fn right_table(&self) -> &str {
        match self {
            Association::BelongsTo(d) => d.fk.destination_table(),
            Association::HasOne(d) | Association::HasMany(d) => d.fk.origin_table(),
            Association::Through { continuation, .. } => continuation.right_table(),
        }
    }

    /// How many related rows this association can produce per base row.
    /// A through chain is to-many as soon as any hop is.
    pub fn cardinality(&self) -> Cardinality {
        match self {
            Association::BelongsTo(_) | Association::HasOne(_) => Cardinality::ToOne,
            Association::HasMany(_) => Cardinality::ToMany,
            Association::Through {
                pivot,
                continuation,
            } => {
                if pivot.cardinality() == Cardinality::ToMany
                    || continuation.cardinality() == Cardinality::ToMany
                {
                    Cardinality::ToMany
                } else {
                    Cardinality::ToOne
                }
            }
        }
    }

    /// Fix the foreign-key columns on the origin side; the destination
    /// side will be the destination table's primary key. On a through
    /// chain this applies to the continuation hop.
    pub fn foreign_key(self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.map_fk(|fk| fk.origin_columns(columns))
    }

    /// Fix the foreign-key columns on both sides, paired positionally.
    /// On a through chain this applies to the continuation hop.
    pub fn foreign_key_to(
        self,
        origin: impl IntoIterator<Item = impl Into<String>>,
        destination: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.map_fk(|fk| fk.explicit_columns(origin, destination))
    }

    /// Resolved column pairs oriented so the left element refers to this
    /// association's left table. For a through chain, the continuation's
    /// mapping.
    pub fn mapping(&self, catalog: &impl SchemaCatalog) -> Result<Vec<(String, String)>> {
        match self {
            Association::BelongsTo(d) => Ok(d.fk.resolve(catalog)?.pairs),
            Association::HasOne(d) | Association::HasMany(d) => Ok(d
                .fk
                .resolve(catalog)?
                .pairs
                .into_iter()
                .map(|(origin, destination)| (destination, origin))
                .collect()),
            Association::Through { continuation, .. } => continuation.mapping(catalog),
        }
    }

    /// The terminal wrapped request; for a through chain, the
    /// continuation's.
    pub(crate) fn wrapped_request(&self) -> &SelectRequest {
        match self {
            Association::BelongsTo(d) | Association::HasOne(d) | Association::HasMany(d) => {
                &d.request
            }
            Association::Through { continuation, .. } => continuation.wrapped_request(),
        }
    }

    fn map_fk(self, f: impl FnOnce(ForeignKeyRequest) -> ForeignKeyRequest) -> Self {
        match self {
            Association::BelongsTo(d) => Association::BelongsTo(DirectAssociation {
                fk: f(d.fk),
                request: d.request,
            }),
            Association::HasOne(d) => Association::HasOne(DirectAssociation {
                fk: f(d.fk),
                request: d.request,
            }),
            Association::HasMany(d) => Association::HasMany(DirectAssociation {
                fk: f(d.fk),
                request: d.request,
            }),
            Association::Through {
                pivot,
                continuation,
            } => Association::Through {
                pivot,
                continuation: Box::new(continuation.map_fk(f)),
            },
        }
    }
}

/// The capability of deriving a new node by transforming its wrapped
/// request.
///
/// Every refinement — filter, order, explicit alias — attaches through
/// this one method, which is what keeps simple and composed associations
/// uniform. On a through chain the transform reaches the continuation's
/// request only: refining a chain means refining its final target. To
/// refine the intermediate hop, construct the pivot with its own
/// refinement before composing.
pub trait RequestDerivable: Sized {
    /// Apply `f` to the wrapped request and return a node of the same
    /// kind.
    fn map_request(self, f: impl FnOnce(SelectRequest) -> SelectRequest) -> Self;

    /// Filter the wrapped request.
    ///
    /// On an association this lands in the join's ON condition, not the
    /// outer WHERE. With a required join, base rows are excluded both
    /// when no related row exists and when related rows fail the
    /// predicate.
    fn filter(self, expr: Expr) -> Self {
        self.map_request(|r| r.filter(expr))
    }

    /// Order the wrapped request.
    ///
    /// Orderings attached to associations are not propagated to the
    /// compiled statement; only the base request's ordering is emitted.
    fn order_by(self, order: OrderTerm) -> Self {
        self.map_request(|r| r.order_by(order))
    }

    /// Bind the wrapped request to an explicit table reference.
    fn referenced_by(self, reference: &TableReference) -> Self {
        self.map_request(|r| r.referenced_by(reference))
    }
}

impl RequestDerivable for Association {
    fn map_request(self, f: impl FnOnce(SelectRequest) -> SelectRequest) -> Self {
        match self {
            Association::BelongsTo(d) => Association::BelongsTo(DirectAssociation {
                fk: d.fk,
                request: f(d.request),
            }),
            Association::HasOne(d) => Association::HasOne(DirectAssociation {
                fk: d.fk,
                request: f(d.request),
            }),
            Association::HasMany(d) => Association::HasMany(DirectAssociation {
                fk: d.fk,
                request: f(d.request),
            }),
            Association::Through {
                pivot,
                continuation,
            } => Association::Through {
                pivot,
                continuation: Box::new(continuation.map_request(f)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, Table};

    fn schema() -> Schema {
        Schema::new()
            .table(
                Table::new("countries")
                    .columns(["code", "name"])
                    .primary_key(["code"]),
            )
            .table(
                Table::new("countryProfiles")
                    .columns(["countryCode", "continentId"])
                    .primary_key(["countryCode"])
                    .foreign_key(["countryCode"], "countries", ["code"])
                    .foreign_key(["continentId"], "continents", ["id"]),
            )
            .table(
                Table::new("continents")
                    .columns(["id", "name"])
                    .primary_key(["id"]),
            )
    }

    #[test]
    fn test_left_and_right_tables() {
        let profile = has_one("countries", "countryProfiles");
        assert_eq!(profile.left_table(), "countries");
        assert_eq!(profile.right_table(), "countryProfiles");

        let continent = belongs_to("countryProfiles", "continents");
        assert_eq!(continent.left_table(), "countryProfiles");
        assert_eq!(continent.right_table(), "continents");

        let chain = Association::through(profile, continent).unwrap();
        assert_eq!(chain.left_table(), "countries");
        assert_eq!(chain.right_table(), "continents");
    }

    #[test]
    fn test_through_rejects_broken_chain() {
        let err = Association::through(
            has_one("countries", "countryProfiles"),
            belongs_to("cities", "continents"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ThroughChainMismatch { pivot_right, continuation_left }
                if pivot_right == "countryProfiles" && continuation_left == "cities"
        ));
    }

    #[test]
    fn test_mapping_orientation() {
        // belongs_to: left owns the FK, pairs read (left fk, right pk)
        let continent = belongs_to("countryProfiles", "continents");
        assert_eq!(
            continent.mapping(&schema()).unwrap(),
            vec![("continentId".to_string(), "id".to_string())]
        );

        // has_one: right owns the FK, pairs are reversed so the left
        // element still refers to the left table
        let profile = has_one("countries", "countryProfiles");
        assert_eq!(
            profile.mapping(&schema()).unwrap(),
            vec![("code".to_string(), "countryCode".to_string())]
        );
    }

    #[test]
    fn test_cardinality() {
        assert_eq!(
            belongs_to("a", "b").cardinality(),
            Cardinality::ToOne,
        );
        assert_eq!(has_one("a", "b").cardinality(), Cardinality::ToOne);
        assert_eq!(has_many("a", "b").cardinality(), Cardinality::ToMany);

        let chain = Association::through(
            has_many("a", "b").foreign_key(["aId"]),
            belongs_to("b", "c").foreign_key(["cId"]),
        )
        .unwrap();
        assert_eq!(chain.cardinality(), Cardinality::ToMany);
    }

    #[test]
    fn test_transform_on_chain_reaches_continuation_only() {
        let chain = Association::through(
            has_one("countries", "countryProfiles"),
            belongs_to("countryProfiles", "continents"),
        )
        .unwrap()
        .filter(Expr::column("name").ne(Expr::text("America")));

        let Association::Through {
            pivot,
            continuation,
        } = chain
        else {
            panic!("expected through chain");
        };
        let Association::HasOne(pivot) = *pivot else {
            panic!("expected has_one pivot");
        };
        let Association::BelongsTo(continuation) = *continuation else {
            panic!("expected belongs_to continuation");
        };
        assert!(pivot.request.filters.is_empty());
        assert_eq!(continuation.request.filters.len(), 1);
    }
}
