//! Error types for OAI formatting and set matching.
//!
//! This module provides the [`OaiError`] type for all library operations
//! and the [`Result`] convenience type.

use thiserror::Error;

/// Error type for all formatting and set matching operations.
///
/// Missing fields or subfields are never errors; every mapping rule treats
/// absence as "emit nothing". Only unsupported requests and input that the
/// exchange parser cannot read are reported.
#[derive(Error, Debug)]
pub enum OaiError {
    /// The requested output format is not one of the supported formats.
    #[error("Format: {0} not allowed")]
    UnsupportedFormat(String),

    /// A raw MarcXchange record could not be parsed.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// An output document could not be written.
    #[error("Serialize error: {0}")]
    SerializeError(String),

    /// Dublin Core output was requested for a hierarchy without records.
    #[error("Cannot format an empty record hierarchy")]
    EmptyHierarchy,

    /// A record identifier was not of the form `agency:recordId`.
    #[error("Invalid record id: {0}")]
    InvalidRecordId(String),
}

impl From<quick_xml::Error> for OaiError {
    fn from(err: quick_xml::Error) -> Self {
        OaiError::SerializeError(err.to_string())
    }
}

/// Convenience type alias for [`std::result::Result`] with [`OaiError`].
pub type Result<T> = std::result::Result<T, OaiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_format_names_the_value() {
        let err = OaiError::UnsupportedFormat("marc21".to_string());
        assert_eq!(err.to_string(), "Format: marc21 not allowed");
    }

    #[test]
    fn test_parse_error_keeps_parser_message() {
        let err = OaiError::ParseError("unexpected end of input".to_string());
        assert!(err.to_string().contains("unexpected end of input"));
    }
}
