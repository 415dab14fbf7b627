use thiserror::Error;

/// Everything that can go wrong while declaring or compiling a join graph.
///
/// All of these surface at construction or compile time, never at row-fetch
/// time. Compilation is all-or-nothing: on error, no partial statement is
/// produced, and the declaration must be fixed before recompiling.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown table: {0}")]
    UnknownTable(String),

    #[error("no foreign key from {origin} to {destination}")]
    MissingForeignKey { origin: String, destination: String },

    #[error("multiple foreign keys from {origin} to {destination}, pass explicit columns to disambiguate")]
    AmbiguousForeignKey { origin: String, destination: String },

    #[error("foreign key column count mismatch between {origin} ({origin_count}) and {destination} ({destination_count})")]
    ColumnCountMismatch {
        origin: String,
        origin_count: usize,
        destination: String,
        destination_count: usize,
    },

    #[error("through chain mismatch: pivot ends at {pivot_right}, continuation starts at {continuation_left}")]
    ThroughChainMismatch {
        pivot_right: String,
        continuation_left: String,
    },

    #[error("table {table} was aliased twice: {first}, then {second}")]
    DuplicateAlias {
        table: String,
        first: String,
        second: String,
    },
}
