//! Error types
//!
//! Every failure aborts the mapping of the whole document; there are no
//! partial results.

use thiserror::Error;

/// Errors raised while loading, querying or mapping a document
#[derive(Debug, Error)]
pub enum Error {
    /// The document has no root element
    #[error("document has no root element")]
    MissingRootElement,

    /// A node without an owner document was queried
    #[error("cannot query a node without an owner document")]
    DetachedNode,

    /// A query context from another document
    #[error("node belongs to a different document")]
    ForeignNode,

    /// The parser rejected the input
    #[error("malformed XML: {0}")]
    MalformedSource(#[from] roxmltree::Error),

    /// The input bytes could not be decoded to UTF-8 text
    #[error("invalid encoding: {0}")]
    Encoding(String),

    /// Reading a source file failed
    #[error("failed to read XML source: {0}")]
    Io(#[from] std::io::Error),

    /// Element nesting is deeper than the configured limit
    #[error("element nesting exceeds the limit of {limit}")]
    DepthExceeded { limit: usize },

    /// The query adapter does not understand an expression
    #[error("unsupported query `{expr}`: {reason}")]
    InvalidQuery { expr: String, reason: String },
}

impl Error {
    /// Stable snake_case name, used as the error atom on the BEAM side
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingRootElement => "missing_root_element",
            Error::DetachedNode => "detached_node",
            Error::ForeignNode => "foreign_node",
            Error::MalformedSource(_) => "malformed_source",
            Error::Encoding(_) => "encoding",
            Error::Io(_) => "io",
            Error::DepthExceeded { .. } => "depth_exceeded",
            Error::InvalidQuery { .. } => "invalid_query",
        }
    }

    pub(crate) fn invalid_query(expr: &str, reason: impl Into<String>) -> Self {
        Error::InvalidQuery {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
