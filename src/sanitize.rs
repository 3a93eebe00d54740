//! MarcX sanitizer and retype.
//!
//! Records delivered in the `marcx` format are cleaned before they leave the
//! catalogue: local extensions are removed, and fields that only BKM
//! (Bibliotekernes Kataloglevering) subscribers may see are dropped for
//! everyone else. Each transform borrows its input and returns a new
//! [`Record`]; the input is never modified.
//!
//! [`retype`] then pairs a cleaned record with its [`RecordType`], derived
//! from the hierarchy level in field 004 subfield `a`.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::sanitize::{remove_local_subfields, retype, RecordType};
//! use marcx_oai::Record;
//!
//! let record = Record::from_line_format(
//!     "004 00 *rn *ah\n\
//!      504 00 *&1 *aNote",
//! )?;
//!
//! let cleaned = remove_local_subfields(&record);
//! assert!(!cleaned.fields().any(|f| f.has_subfield('&')));
//!
//! let document = retype(cleaned);
//! assert_eq!(document.record_type, RecordType::BibliographicMain);
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use std::fmt;

use tracing::trace;

use crate::record::{Field, Record};

/// Fields only BKM subscribers may receive.
pub const BKM_FIELDS: &[&str] = &["504", "600", "610", "666", "990", "991"];

/// Subfield code marking local (non-exchanged) data.
pub const LOCAL_SUBFIELD: char = '&';

/// Temporarily withheld field; harvesters do not accept it yet.
pub const FIELD_665: &str = "665";

/// Hierarchy level of a bibliographic record, written as the `type` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Single-level record
    Bibliographic,
    /// Head of a multi-volume work
    BibliographicMain,
    /// Section between head and volume
    BibliographicSection,
    /// Volume under a head or section
    BibliographicVolume,
}

impl RecordType {
    /// The attribute value for this type
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Bibliographic => "Bibliographic",
            RecordType::BibliographicMain => "BibliographicMain",
            RecordType::BibliographicSection => "BibliographicSection",
            RecordType::BibliographicVolume => "BibliographicVolume",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sanitized record ready for MarcXchange serialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarcxDocument {
    /// Hierarchy level of the record
    pub record_type: RecordType,
    /// The record itself
    pub record: Record,
}

/// Drop BKM-only fields: 504, 600, 610, 666, 990, 991, and any 5xx field
/// whose first `&` subfield is `1`.
#[must_use]
pub fn remove_bkm_fields(record: &Record) -> Record {
    record.retain_fields(|field| {
        let keep = !is_bkm_field(field);
        if !keep {
            trace!(tag = %field.tag, "removing BKM field");
        }
        keep
    })
}

fn is_bkm_field(field: &Field) -> bool {
    BKM_FIELDS.contains(&field.tag.as_str())
        || (field.tag.starts_with('5') && field.get_subfield(LOCAL_SUBFIELD) == Some("1"))
}

/// Drop every field whose tag begins with a lowercase letter.
#[must_use]
pub fn remove_local_fields(record: &Record) -> Record {
    record.retain_fields(|field| !field.is_local())
}

/// Drop subfield `&` from every field.
#[must_use]
pub fn remove_local_subfields(record: &Record) -> Record {
    record.map_fields(|field| field.retain_subfields(|s| s.code != LOCAL_SUBFIELD))
}

/// Drop subfield `u` from field 241.
#[must_use]
pub fn remove_subfield_241u(record: &Record) -> Record {
    remove_subfield_where(record, |field| field.tag == "241", 'u')
}

/// Drop subfield `0` from every three-character 5xx field.
#[must_use]
pub fn remove_subfield_0_of_5xx_fields(record: &Record) -> Record {
    remove_subfield_where(
        record,
        |field| field.tag.len() == 3 && field.tag.starts_with('5'),
        '0',
    )
}

/// Drop every occurrence of field 665.
#[must_use]
pub fn remove_field_665(record: &Record) -> Record {
    record.retain_fields(|field| field.tag != FIELD_665)
}

fn remove_subfield_where<P>(record: &Record, applies: P, code: char) -> Record
where
    P: Fn(&Field) -> bool,
{
    record.map_fields(|field| {
        if applies(field) {
            field.retain_subfields(|s| s.code != code)
        } else {
            field.clone()
        }
    })
}

/// Classify a record by its hierarchy level in 004 `a`.
#[must_use]
pub fn classify_record_type(record: &Record) -> RecordType {
    match record.get_value("004", 'a') {
        Some("h") => RecordType::BibliographicMain,
        Some("s") => RecordType::BibliographicSection,
        Some("b") => RecordType::BibliographicVolume,
        _ => RecordType::Bibliographic,
    }
}

/// Pair a record with its classified [`RecordType`].
#[must_use]
pub fn retype(record: Record) -> MarcxDocument {
    let record_type = classify_record_type(&record);
    trace!(%record_type, "retyped record");
    MarcxDocument {
        record_type,
        record,
    }
}
