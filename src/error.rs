//! Error types for the cash engine.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, CashError>;

/// Errors that can occur while reconciling and registering movements.
#[derive(Error, Debug)]
pub enum CashError {
    /// Failed to read or write backing files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No nonzero amount was stated and none could be derived from the breakdown
    #[error("no amount could be derived: enter an amount or mark the notes/coins that changed")]
    InvalidAmount,

    /// A breakdown entry would drive a denomination count below zero
    #[error("not enough {label} in {account}: have {have}, need {need}")]
    InsufficientStock {
        account: String,
        label: String,
        have: u32,
        need: u32,
    },

    /// A named collection is absent from the store
    #[error("collection '{0}' not found")]
    CollectionNotFound(String),

    /// The history collection could not be resolved, even by fuzzy match;
    /// carries the collections that do exist for operator diagnosis
    #[error("history collection not found; available collections: {}", candidates.join(", "))]
    HistoryTargetMissing { candidates: Vec<String> },

    /// A cell address fell outside the collection's rows
    #[error("cell ({row}, {col}) out of range in collection '{collection}'")]
    CellOutOfRange {
        collection: String,
        row: usize,
        col: usize,
    },

    /// A breakdown entry named a denomination the inventory does not have
    #[error("no denomination labelled '{label}'")]
    UnknownDenomination { label: String },

    /// User/PIN did not match the configured credentials
    #[error("invalid user or PIN")]
    InvalidCredentials,

    /// Missing command-line arguments
    #[error("missing arguments. Usage: cashbox <data-dir> <movements.csv>")]
    MissingArgument,
}
