//! Error types for the block parser.
//!
//! Walking markup never fails on content: malformed verse numbers, stray
//! milestones and unknown styles degrade to best-effort blocks and are
//! reported as warnings. `ParserError` covers the remaining failures at the
//! edges of the component (bad inputs to the public API, bad configuration).

use thiserror::Error;

/// Main error type for the parser library.
#[derive(Debug, Error)]
pub enum ParserError {
    /// Invalid book code format.
    #[error("Invalid book code: '{0}'. Expected three uppercase letters or digits (e.g., MRK, 1JN)")]
    InvalidBookCode(String),

    /// Configuration YAML could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml_ng::Error),

    /// Configuration parsed but is not usable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller asked the walk to stop.
    #[error("Parsing cancelled before chapter {chapter}, node {node}")]
    Cancelled { chapter: u32, node: usize },
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;
