//! Record hierarchies and the higher-level identifier lookup.
//!
//! A bibliographic work in danMARC2 may span up to three levels: a head
//! record, optional sections, and volumes. A harvest request supplies one
//! [`HierarchyEntry`] per level, narrowest first (volume, then section, then
//! head); absent levels are simply left out.
//!
//! Entries deserialize from the JSON shape used by the harvest front end:
//!
//! ```
//! use marcx_oai::HierarchyEntry;
//!
//! let json = r#"{"content": "<record/>", "children": [{"bibliographicRecordId": "23642468", "agencyId": 870970}]}"#;
//! let entry: HierarchyEntry = serde_json::from_str(json)?;
//! assert_eq!(entry.children[0].bibliographic_record_id, "23642468");
//! # Ok::<(), serde_json::Error>(())
//! ```

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::record::Record;

/// Reference from a record to one of its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildRef {
    /// Record id of the child
    pub bibliographic_record_id: String,
    /// Owning agency of the child
    pub agency_id: u32,
}

impl ChildRef {
    /// Create a child reference
    #[must_use]
    pub fn new(bibliographic_record_id: impl Into<String>, agency_id: u32) -> Self {
        ChildRef {
            bibliographic_record_id: bibliographic_record_id.into(),
            agency_id,
        }
    }
}

/// One level of a bibliographic hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// Raw MarcXchange record
    pub content: String,
    /// Direct children of this record, in order
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

impl HierarchyEntry {
    /// Create an entry without children
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        HierarchyEntry {
            content: content.into(),
            children: Vec::new(),
        }
    }

    /// Add a child reference
    #[must_use]
    pub fn with_child(mut self, child: ChildRef) -> Self {
        self.children.push(child);
        self
    }
}

/// Identifier of the record's structural parent, as `"{001b},{014a}"`.
///
/// Returns an empty string if the record has no 014 `a`, or if the 014 field
/// carries subfield `x`: such a 014 is a cross-reference (a review pointing at
/// the reviewed work, for example) rather than a parent link. When either
/// subfield repeats, the last occurrence wins.
///
/// # Examples
///
/// ```
/// use marcx_oai::{higher_level_identifier, Record};
///
/// let volume = Record::from_line_format("001 00 *a23642468 *b870970\n014 00 *a23642433")?;
/// assert_eq!(higher_level_identifier(&volume), "870970,23642433");
///
/// let review = Record::from_line_format("001 00 *a1 *b870971\n014 00 *a23642433 *xANM")?;
/// assert_eq!(higher_level_identifier(&review), "");
/// # Ok::<(), marcx_oai::OaiError>(())
/// ```
#[must_use]
pub fn higher_level_identifier(record: &Record) -> String {
    let agency = record.values("001", 'b').last().unwrap_or_default();

    let parent = record
        .fields_by_tag("014")
        .filter(|field| !field.has_subfield('x'))
        .flat_map(|field| field.subfields_by_code('a'))
        .last()
        .unwrap_or_default();

    if parent.is_empty() {
        trace!("no higher-level identifier");
        return String::new();
    }
    format!("{agency},{parent}")
}
