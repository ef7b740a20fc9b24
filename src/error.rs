//! Error type of the format-brokerage and tree-streaming layers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::parser::ParsingError;
use crate::registry::Operation;

/// Errors raised by the [SchemaRegistry](crate::registry::SchemaRegistry),
/// the tree stream iterators, and format readers and writers.
#[derive(Error, Debug)]
pub enum DataIoError {
    #[error("Format '{schema}' is not supported for {operation}")]
    UnsupportedFormat { schema: String, operation: Operation },

    #[error("Format '{0}' is already registered")]
    DuplicateSchema(String),

    #[error("Format identifier must not be empty")]
    EmptySchema,

    #[error("Tree offset {offset} is out of range: source has {found} tree(s)")]
    OffsetOutOfRange { offset: usize, found: usize },

    #[error("Failed to open tree source '{}': {source}", path.display())]
    OpenSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("No dataset to write")]
    MissingDataSet,

    #[error("Parse error: {0}")]
    Parsing(#[from] ParsingError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result alias with [DataIoError].
pub type Result<T> = std::result::Result<T, DataIoError>;
