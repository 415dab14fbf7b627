//! Relationship-aware query building.
//!
//! Declare how tables relate — belongs-to, has-one, has-many, and through
//! chains that pivot across intermediate tables — then compile a request
//! plus its joined associations into a single flat SELECT with correctly
//! ordered, aliased, and conditioned joins.
//!
//! ```
//! # fn main() -> seam::Result<()> {
//! use seam::{Association, Schema, SelectRequest, Table, belongs_to, has_one};
//!
//! let schema = Schema::new()
//!     .table(
//!         Table::new("countries")
//!             .columns(["code", "name"])
//!             .primary_key(["code"]),
//!     )
//!     .table(
//!         Table::new("countryProfiles")
//!             .columns(["countryCode", "continentId", "currency"])
//!             .primary_key(["countryCode"])
//!             .foreign_key(["countryCode"], "countries", ["code"])
//!             .foreign_key(["continentId"], "continents", ["id"]),
//!     )
//!     .table(
//!         Table::new("continents")
//!             .columns(["id", "name"])
//!             .primary_key(["id"]),
//!     );
//!
//! // countries -> countryProfiles -> continents, as one association
//! let continent = Association::through(
//!     has_one("countries", "countryProfiles"),
//!     belongs_to("countryProfiles", "continents"),
//! )?;
//!
//! let query = SelectRequest::all("countries")
//!     .joining_required(continent)
//!     .compile_sql(&schema)?;
//!
//! assert_eq!(
//!     query.sql,
//!     "SELECT \"countries\".* \
//!      FROM \"countries\" \
//!      JOIN \"countryProfiles\" ON \"countryProfiles\".\"countryCode\" = \"countries\".\"code\" \
//!      JOIN \"continents\" ON \"continents\".\"id\" = \"countryProfiles\".\"continentId\""
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Associations are plain immutable values: they hold no database handle,
//! resolve their foreign keys only at compile time (a schema catalog does
//! not need to exist when they are declared), and can be cloned, refined,
//! composed, and reused across any number of compilations. Compilation
//! itself is a pure synchronous computation; running the compiled
//! statement against a live connection is the caller's business.

pub mod alias;
mod association;
mod compile;
mod error;
mod mapping;
mod request;
pub mod schema;

pub use association::{
    Association, Cardinality, DirectAssociation, RequestDerivable, belongs_to, has_many, has_one,
};
pub use error::Error;
pub use mapping::{ForeignKeyRequest, JoinMapping};
pub use request::{JoinRequirement, SelectRequest, TableReference};
pub use schema::{ForeignKey, Schema, SchemaCatalog, Table};

// Re-export the SQL layer types that requests are refined with.
pub use seam_sql::{Expr, OrderTerm, RenderedSql, SelectStmt};

/// Result type for seam operations.
pub type Result<T> = std::result::Result<T, Error>;
