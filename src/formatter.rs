//! Record hierarchy formatting.
//!
//! [`format_records`] turns one bibliographic hierarchy (volume, section,
//! head, narrowest first) into the metadata document a harvester asked for:
//!
//! - `oai_dc`: a Dublin Core document for the first (narrowest) entry, with
//!   the higher-level identifiers of the other entries as `dc:relation`.
//! - `marcx`: a MarcXchange collection of every entry, broadest first, each
//!   record sanitized according to the harvester's entitlement. Every record
//!   gains one 015 field per direct child, so consumers can walk the
//!   hierarchy downwards.
//!
//! The requested format is validated before any record is parsed, so an
//! unsupported format never produces partial output.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::{format_records, HierarchyEntry};
//!
//! let record = r#"<marcx:record xmlns:marcx="info:lc/xmlns/marcxchange-v1">
//!     <marcx:datafield tag="001" ind1="0" ind2="0">
//!         <marcx:subfield code="a">23645564</marcx:subfield>
//!         <marcx:subfield code="b">870970</marcx:subfield>
//!     </marcx:datafield>
//! </marcx:record>"#;
//!
//! let hierarchy = vec![HierarchyEntry::new(record)];
//! let xml = format_records(&hierarchy, "oai_dc", &["nat"])?;
//! assert!(xml.contains("<dc:identifier>870970,23645564</dc:identifier>"));
//!
//! assert!(format_records(&hierarchy, "marc21", &["nat"]).is_err());
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::{FormatterConfig, OutputFormat};
use crate::dublin_core::build_dublin_core;
use crate::error::{OaiError, Result};
use crate::hierarchy::{higher_level_identifier, ChildRef, HierarchyEntry};
use crate::marcxchange::{collection_to_marcxchange, parse_record};
use crate::record::{Field, Record};
use crate::sanitize::{
    remove_bkm_fields, remove_field_665, remove_local_fields, remove_local_subfields,
    remove_subfield_0_of_5xx_fields, remove_subfield_241u, retype,
};

/// The allowed set that entitles a harvester to BKM data.
pub const BKM_SET: &str = "bkm";

/// Tag of the synthesized child-reference field.
pub const CHILD_REFERENCE_TAG: &str = "015";

/// Format a record hierarchy with the default [`FormatterConfig`].
///
/// `allowed_sets` are the OAI sets the harvester is entitled to; they are
/// compared case-insensitively, and only `bkm` currently changes the output.
///
/// # Errors
///
/// - [`OaiError::UnsupportedFormat`] if `format` is not `oai_dc` or `marcx`
/// - [`OaiError::ParseError`] if an entry's content cannot be parsed
/// - [`OaiError::EmptyHierarchy`] if `oai_dc` is requested for no entries
pub fn format_records<S: AsRef<str>>(
    hierarchy: &[HierarchyEntry],
    format: &str,
    allowed_sets: &[S],
) -> Result<String> {
    format_records_with_config(hierarchy, format, allowed_sets, &FormatterConfig::default())
}

/// Format a record hierarchy.
///
/// # Errors
///
/// See [`format_records`].
#[tracing::instrument(skip_all, fields(format = %format, entries = hierarchy.len()))]
pub fn format_records_with_config<S: AsRef<str>>(
    hierarchy: &[HierarchyEntry],
    format: &str,
    allowed_sets: &[S],
    config: &FormatterConfig,
) -> Result<String> {
    let output_format: OutputFormat = format.parse()?;
    format_hierarchy(hierarchy, output_format, bkm_allowed(allowed_sets), config)
}

/// Format many independent hierarchies in parallel.
///
/// Results are returned in input order, one per hierarchy; a failing
/// hierarchy does not affect the others.
///
/// # Errors
///
/// Returns [`OaiError::UnsupportedFormat`] before any work is done if
/// `format` is not supported.
pub fn format_batch<S: AsRef<str>>(
    hierarchies: &[Vec<HierarchyEntry>],
    format: &str,
    allowed_sets: &[S],
    config: &FormatterConfig,
) -> Result<Vec<Result<String>>> {
    let output_format: OutputFormat = format.parse()?;
    let bkm = bkm_allowed(allowed_sets);

    debug!(hierarchies = hierarchies.len(), %output_format, "formatting batch");
    Ok(hierarchies
        .par_iter()
        .map(|hierarchy| format_hierarchy(hierarchy, output_format, bkm, config))
        .collect())
}

/// Whether any allowed set is `bkm`, ignoring case.
#[must_use]
pub fn bkm_allowed<S: AsRef<str>>(allowed_sets: &[S]) -> bool {
    allowed_sets
        .iter()
        .any(|set| set.as_ref().to_lowercase() == BKM_SET)
}

fn format_hierarchy(
    hierarchy: &[HierarchyEntry],
    output_format: OutputFormat,
    bkm_allowed: bool,
    config: &FormatterConfig,
) -> Result<String> {
    match output_format {
        OutputFormat::OaiDc => {
            let records = parse_hierarchy(hierarchy, false)?;
            format_oai_dc(&records, config)
        }
        OutputFormat::MarcX => {
            let records = parse_hierarchy(hierarchy, true)?;
            format_marcx(&records, bkm_allowed, config)
        }
    }
}

/// Parse every entry, optionally adding a 015 per child and re-sorting fields by tag.
fn parse_hierarchy(hierarchy: &[HierarchyEntry], with_children: bool) -> Result<Vec<Record>> {
    hierarchy
        .iter()
        .map(|entry| {
            let record = parse_record(&entry.content)?;
            if with_children {
                Ok(with_child_references(&record, &entry.children))
            } else {
                Ok(record)
            }
        })
        .collect()
}

/// Copy of `record` with one 015 `a` per child, fields sorted by tag.
#[must_use]
pub fn with_child_references(record: &Record, children: &[ChildRef]) -> Record {
    let mut extended = record.clone();
    for child in children {
        extended.add_field(
            Field::builder(CHILD_REFERENCE_TAG, '0', '0')
                .subfield_str('a', &child.bibliographic_record_id)
                .build(),
        );
    }
    extended.sorted_by_tag()
}

fn format_oai_dc(records: &[Record], config: &FormatterConfig) -> Result<String> {
    let first = records.first().ok_or(OaiError::EmptyHierarchy)?;

    let relations: Vec<String> = records[..records.len() - 1]
        .iter()
        .map(higher_level_identifier)
        .collect();
    trace!(?relations, "higher-level identifiers");

    build_dublin_core(first, &relations).to_xml(config.xml_declaration)
}

fn format_marcx(records: &[Record], bkm_allowed: bool, config: &FormatterConfig) -> Result<String> {
    let documents: Vec<_> = records
        .iter()
        .rev()
        .map(|record| retype(sanitize_for_marcx(record, bkm_allowed, config)))
        .collect();

    collection_to_marcxchange(&documents, config.xml_declaration)
}

/// Apply the `marcx` delivery transforms to one record.
///
/// Local fields and field 665 are always removed. BKM fields and 241 `u`
/// are removed unless the harvester is entitled to BKM data. Local
/// subfields are removed last.
#[must_use]
pub fn sanitize_for_marcx(record: &Record, bkm_allowed: bool, config: &FormatterConfig) -> Record {
    let mut record = remove_field_665(&remove_local_fields(record));
    if !bkm_allowed {
        record = remove_subfield_241u(&remove_bkm_fields(&record));
    }
    if config.strip_subfield_0_of_5xx {
        record = remove_subfield_0_of_5xx_fields(&record);
    }
    remove_local_subfields(&record)
}
