//! Record identifiers of the form `agency:recordId`.
//!
//! The harvest front end addresses records as `870970:23642468`; the older
//! `870970-23642468` spelling is accepted too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OaiError;
use crate::hierarchy::ChildRef;

/// Identifier of a single record owned by an agency.
///
/// # Examples
///
/// ```
/// use marcx_oai::RecordId;
///
/// let id: RecordId = "870970:23642468".parse()?;
/// assert_eq!(id.agency_id, 870_970);
/// assert_eq!(id.record_id, "23642468");
/// assert_eq!(id.to_string(), "870970:23642468");
///
/// assert!("nope".parse::<RecordId>().is_err());
/// # Ok::<(), marcx_oai::OaiError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordId {
    /// Owning agency
    pub agency_id: u32,
    /// Record id within the agency
    pub record_id: String,
}

impl RecordId {
    /// Create an identifier
    #[must_use]
    pub fn new(agency_id: u32, record_id: impl Into<String>) -> Self {
        RecordId {
            agency_id,
            record_id: record_id.into(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.agency_id, self.record_id)
    }
}

impl FromStr for RecordId {
    type Err = OaiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || OaiError::InvalidRecordId(s.to_string());

        let (agency, record) = s.split_once([':', '-']).ok_or_else(invalid)?;
        let agency_id = agency.trim().parse::<u32>().map_err(|_| invalid())?;
        let record = record.trim();
        if record.is_empty() {
            return Err(invalid());
        }

        Ok(RecordId::new(agency_id, record))
    }
}

impl From<RecordId> for ChildRef {
    fn from(id: RecordId) -> Self {
        ChildRef::new(id.record_id, id.agency_id)
    }
}
