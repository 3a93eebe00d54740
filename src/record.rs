//! danMARC2 bibliographic record structures and operations.
//!
//! This module provides the core record types shared by every transform:
//! - [`Record`] - An ordered sequence of fields plus an optional leader
//! - [`Field`] - A tagged field with two indicators and repeatable subfields
//! - [`Subfield`] - A coded data element within a field
//!
//! Unlike MARC21 records, danMARC2 records carry even their control data
//! (001, 004, 008, ...) in ordinary subfield-bearing fields, so a record is
//! simply a list of [`Field`]s. Field order and subfield order are preserved
//! by every operation in this crate unless a rule explicitly re-sorts.
//!
//! All transforms on [`Record`] are copy-producing: they borrow the input and
//! return a new record, so callers never observe mutation.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::{Field, Record};
//!
//! let record = Record::builder()
//!     .field(
//!         Field::builder("001", '0', '0')
//!             .subfield_str('a', "23645564")
//!             .subfield_str('b', "870970")
//!             .build(),
//!     )
//!     .field(Field::builder("245", '0', '0').subfield_str('a', "Title").build())
//!     .build();
//!
//! assert_eq!(record.get_value("001", 'b'), Some("870970"));
//! assert_eq!(record.fields_by_tag("245").count(), 1);
//! ```
//!
//! Records can also be read from the danMARC2 line format used throughout
//! cataloguing tools, one field per line with `*`-prefixed subfields:
//!
//! ```
//! use marcx_oai::Record;
//!
//! let record = Record::from_line_format(
//!     "001 00 *a23645564 *b870970\n\
//!      245 00 *aTraekopfuglens kroenike",
//! )?;
//! assert_eq!(record.get_value("245", 'a'), Some("Traekopfuglens kroenike"));
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{OaiError, Result};

/// Subfield delimiter of the danMARC2 line format.
const LINE_FORMAT_DELIMITER: char = '*';

/// A danMARC2 bibliographic record
///
/// Fields are stored in a single `Vec` so that the relative order of fields
/// with different tags survives every transform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Leader as found in the exchange document, if any
    pub leader: Option<String>,
    /// Fields in record order
    pub fields: Vec<Field>,
}

/// A field in a danMARC2 record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag (3 characters; a lowercase first letter marks a local field)
    pub tag: String,
    /// First indicator
    pub indicator1: char,
    /// Second indicator
    pub indicator2: char,
    /// Subfields (stored in `SmallVec` to avoid allocation for typical fields with 4 or fewer subfields)
    pub subfields: SmallVec<[Subfield; 4]>,
}

/// A subfield within a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subfield {
    /// Subfield code (single character, not necessarily alphanumeric, e.g. `&`)
    pub code: char,
    /// Subfield value
    pub value: String,
}

impl Subfield {
    /// Create a new subfield
    #[must_use]
    pub fn new(code: char, value: impl Into<String>) -> Self {
        Subfield {
            code,
            value: value.into(),
        }
    }
}

impl Field {
    /// Create a new field without subfields
    #[must_use]
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Self {
        Field {
            tag: tag.into(),
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        }
    }

    /// Create a builder for fluently constructing fields
    #[must_use]
    pub fn builder(tag: impl Into<String>, indicator1: char, indicator2: char) -> FieldBuilder {
        FieldBuilder {
            field: Field::new(tag, indicator1, indicator2),
        }
    }

    /// Append a subfield
    pub fn add_subfield(&mut self, code: char, value: String) {
        self.subfields.push(Subfield { code, value });
    }

    /// Append a subfield using a string slice
    pub fn add_subfield_str(&mut self, code: char, value: &str) {
        self.add_subfield(code, value.to_string());
    }

    /// Get the value of the first subfield with the given code
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&str> {
        self.subfields
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.value.as_str())
    }

    /// Iterate over the values of every subfield with the given code, in field order
    pub fn subfields_by_code(&self, code: char) -> impl Iterator<Item = &str> {
        self.subfields
            .iter()
            .filter(move |s| s.code == code)
            .map(|s| s.value.as_str())
    }

    /// Iterate over the values of every subfield whose code is in `codes`, in field order
    pub fn values_matching<'a>(&'a self, codes: &'a [char]) -> impl Iterator<Item = &'a str> {
        self.subfields
            .iter()
            .filter(move |s| codes.contains(&s.code))
            .map(|s| s.value.as_str())
    }

    /// Join the values of every subfield whose code is in `codes` with `separator`
    #[must_use]
    pub fn join_values(&self, codes: &[char], separator: &str) -> String {
        self.values_matching(codes).collect::<Vec<_>>().join(separator)
    }

    /// Whether the field has at least one subfield with the given code
    #[must_use]
    pub fn has_subfield(&self, code: char) -> bool {
        self.subfields.iter().any(|s| s.code == code)
    }

    /// Whether this is a local (non-catalogued) field, i.e. its tag starts with a lowercase letter
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.tag.chars().next().is_some_and(|c| c.is_ascii_lowercase())
    }

    /// Copy of this field keeping only the subfields accepted by `keep`
    #[must_use]
    pub fn retain_subfields<F>(&self, mut keep: F) -> Field
    where
        F: FnMut(&Subfield) -> bool,
    {
        Field {
            tag: self.tag.clone(),
            indicator1: self.indicator1,
            indicator2: self.indicator2,
            subfields: self.subfields.iter().filter(|s| keep(s)).cloned().collect(),
        }
    }

    /// Parse a single line of the danMARC2 line format, e.g. `245 00 *aTitle *cSubtitle`
    ///
    /// # Errors
    ///
    /// Returns an error if the line is too short to hold a tag and indicators.
    pub fn from_line(line: &str) -> Result<Field> {
        let mut chars = line.trim_start().chars();
        let tag: String = chars.by_ref().take(3).collect();
        if tag.chars().count() != 3 {
            return Err(OaiError::ParseError(format!(
                "Line too short for a field tag: '{line}'"
            )));
        }

        let rest: String = chars.collect();
        let rest = rest.trim_start();
        let mut indicators = rest.chars();
        let (Some(indicator1), Some(indicator2)) = (indicators.next(), indicators.next()) else {
            return Err(OaiError::ParseError(format!(
                "Missing indicators in field {tag}: '{line}'"
            )));
        };

        let mut field = Field::new(tag, indicator1, indicator2);
        let body: String = indicators.collect();
        for segment in body.split(LINE_FORMAT_DELIMITER).skip(1) {
            let mut segment_chars = segment.chars();
            if let Some(code) = segment_chars.next() {
                field.add_subfield(code, segment_chars.as_str().trim().to_string());
            }
        }

        Ok(field)
    }
}

impl Record {
    /// Create an empty record without a leader
    #[must_use]
    pub fn new() -> Self {
        Record::default()
    }

    /// Create a builder for fluently constructing records
    ///
    /// # Examples
    ///
    /// ```
    /// use marcx_oai::{Field, Record};
    ///
    /// let record = Record::builder()
    ///     .field(Field::builder("004", '0', '0').subfield_str('a', "h").build())
    ///     .build();
    /// assert_eq!(record.get_value("004", 'a'), Some("h"));
    /// ```
    #[must_use]
    pub fn builder() -> RecordBuilder {
        RecordBuilder {
            record: Record::new(),
        }
    }

    /// Parse a record from the danMARC2 line format, one field per line
    ///
    /// Blank lines are skipped. Subfield values are trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if any non-blank line cannot be read as a field.
    pub fn from_line_format(text: &str) -> Result<Record> {
        let fields = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Field::from_line)
            .collect::<Result<Vec<_>>>()?;
        Ok(Record {
            leader: None,
            fields,
        })
    }

    /// Append a field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Iterate over all fields in record order
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Iterate over fields with the given tag, in record order
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> {
        self.fields.iter().filter(move |f| f.tag == tag)
    }

    /// Get the first field with the given tag
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Get the first value of `code` in the first field with `tag` that has it
    #[must_use]
    pub fn get_value(&self, tag: &str, code: char) -> Option<&str> {
        self.fields
            .iter()
            .filter(|f| f.tag == tag)
            .find_map(|f| f.get_subfield(code))
    }

    /// Iterate over every value of `code` across all fields with `tag`
    pub fn values<'a>(&'a self, tag: &'a str, code: char) -> impl Iterator<Item = &'a str> {
        self.fields_by_tag(tag)
            .flat_map(move |f| f.subfields_by_code(code))
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copy of this record keeping only the fields accepted by `keep`
    #[must_use]
    pub fn retain_fields<F>(&self, mut keep: F) -> Record
    where
        F: FnMut(&Field) -> bool,
    {
        Record {
            leader: self.leader.clone(),
            fields: self.fields.iter().filter(|f| keep(f)).cloned().collect(),
        }
    }

    /// Copy of this record with every field replaced by `map(field)`
    #[must_use]
    pub fn map_fields<F>(&self, map: F) -> Record
    where
        F: FnMut(&Field) -> Field,
    {
        Record {
            leader: self.leader.clone(),
            fields: self.fields.iter().map(map).collect(),
        }
    }

    /// Copy of this record with fields in ascending tag order
    ///
    /// The sort is stable: fields sharing a tag keep their relative order.
    #[must_use]
    pub fn sorted_by_tag(&self) -> Record {
        let mut sorted = self.clone();
        sorted.fields.sort_by(|a, b| a.tag.cmp(&b.tag));
        sorted
    }
}

/// Builder for fluently constructing [`Field`]s
#[derive(Debug)]
pub struct FieldBuilder {
    field: Field,
}

impl FieldBuilder {
    /// Add a subfield
    #[must_use]
    pub fn subfield(mut self, code: char, value: String) -> Self {
        self.field.add_subfield(code, value);
        self
    }

    /// Add a subfield using a string slice
    #[must_use]
    pub fn subfield_str(mut self, code: char, value: &str) -> Self {
        self.field.add_subfield_str(code, value);
        self
    }

    /// Build the field
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}

/// Builder for fluently constructing [`Record`]s
#[derive(Debug)]
pub struct RecordBuilder {
    record: Record,
}

impl RecordBuilder {
    /// Set the leader
    #[must_use]
    pub fn leader(mut self, leader: impl Into<String>) -> Self {
        self.record.leader = Some(leader.into());
        self
    }

    /// Append a field
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.record.add_field(field);
        self
    }

    /// Build the record
    #[must_use]
    pub fn build(self) -> Record {
        self.record
    }
}
