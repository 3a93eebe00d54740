#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! ## Modules
//!
//! - [`record`] - danMARC2 record structures (`Record`, `Field`, `Subfield`)
//! - [`marcxchange`] - MarcXchange parsing and serialization
//! - [`dublin_core`] - Dublin Core mapping and `oai_dc` documents
//! - [`sanitize`] - MarcX sanitizing transforms and record retyping
//! - [`hierarchy`] - Hierarchy entries and the higher-level identifier
//! - [`formatter`] - Record hierarchy formatting
//! - [`set_matcher`] - OAI set classification
//! - [`field_map`] - Tag-keyed field handler dispatch
//! - [`config`] - Formatter and set matcher options
//! - [`identifier`] - `agency:recordId` identifiers
//! - [`error`] - Error types and result type

pub mod config;
pub mod dublin_core;
pub mod error;
pub mod field_map;
pub mod formatter;
pub mod hierarchy;
pub mod identifier;
pub mod marcxchange;
/// Core danMARC2 record structures (`Record`, `Field`, `Subfield`)
pub mod record;
pub mod sanitize;
pub mod set_matcher;

pub use config::{allowed_formats, FormatterConfig, OutputFormat, SetMatcherConfig};
pub use dublin_core::{build_dublin_core, DcDocument, DcElement, DcElementName};
pub use error::{OaiError, Result};
pub use field_map::FieldMap;
pub use formatter::{format_batch, format_records, format_records_with_config};
pub use hierarchy::{higher_level_identifier, ChildRef, HierarchyEntry};
pub use identifier::RecordId;
pub use marcxchange::{parse_record, record_to_marcxchange};
pub use record::{Field, FieldBuilder, Record, RecordBuilder, Subfield};
pub use sanitize::{classify_record_type, retype, MarcxDocument, RecordType};
pub use set_matcher::{
    classify, classify_record, classify_with_config, is_eligible, OaiSet, OaiSetSignals,
};
