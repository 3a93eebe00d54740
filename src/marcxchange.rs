//! MarcXchange serialization and deserialization of danMARC2 records.
//!
//! MarcXchange (ISO 25577, namespace `info:lc/xmlns/marcxchange-v1`) is the
//! XML interchange syntax in which danMARC2 records are stored and delivered.
//! Every field is a `datafield` with `tag`, `ind1` and `ind2` attributes and
//! `subfield` children carrying a `code` attribute.
//!
//! For deserialization, default-namespace (`<record xmlns="...">`),
//! prefixed (`<marcx:record xmlns:marcx="...">`) and namespace-free documents
//! are accepted. The leader is optional; `controlfield` elements are ignored
//! since danMARC2 keeps control data in ordinary data fields.
//!
//! Serialization always uses the `marcx:` prefix, as harvesters expect.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::marcxchange;
//!
//! let xml = r#"<marcx:record xmlns:marcx="info:lc/xmlns/marcxchange-v1">
//!     <marcx:datafield tag="245" ind1="0" ind2="0">
//!         <marcx:subfield code="a">Glem det</marcx:subfield>
//!     </marcx:datafield>
//! </marcx:record>"#;
//!
//! let record = marcxchange::parse_record(xml)?;
//! assert_eq!(record.get_value("245", 'a'), Some("Glem det"));
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use tracing::{debug, trace};

use crate::error::{OaiError, Result};
use crate::record::{Field, Record};
use crate::sanitize::MarcxDocument;

/// The MarcXchange namespace URI.
pub const MARCX_NS: &str = "info:lc/xmlns/marcxchange-v1";

/// Value of the `format` attribute on every serialized record.
pub const MARCX_FORMAT: &str = "danMARC2";

/// Leader written for records that were parsed without one.
pub const DEFAULT_LEADER: &str = "00000n    2200000   4500";

// ---------------------------------------------------------------------------
// Deserialization: MarcXchange → Record
// ---------------------------------------------------------------------------

/// Parse a single MarcXchange `record` document.
///
/// Subfield text is kept exactly as written, including surrounding
/// whitespace.
///
/// # Errors
///
/// Returns [`OaiError::ParseError`] carrying the XML parser's message if the
/// document is not well-formed or its root element is not a `record`.
#[tracing::instrument(skip_all, fields(len = xml.len()))]
pub fn parse_record(xml: &str) -> Result<Record> {
    let mut records = read_document(xml, "record")?;
    let record = records.pop().unwrap_or_default();
    trace!(fields = record.len(), "parsed record");
    Ok(record)
}

/// Parse a MarcXchange `collection` document into its records, in document order.
///
/// # Errors
///
/// Returns [`OaiError::ParseError`] if the document cannot be parsed or its
/// root element is not a `collection`.
pub fn parse_collection(xml: &str) -> Result<Vec<Record>> {
    read_document(xml, "collection")
}

fn parse_error(message: impl std::fmt::Display) -> OaiError {
    OaiError::ParseError(format!("Failed to parse MarcXchange: {message}"))
}

/// Elements are matched on their local name, so prefixed, default-namespace
/// and unqualified documents read alike.
fn read_document(xml: &str, root: &str) -> Result<Vec<Record>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut state = ReadState::default();
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        match reader.read_event().map_err(|e| {
            parse_error(format_args!("{e} at position {}", reader.buffer_position()))
        })? {
            Event::Start(e) => {
                check_root(&e, root, depth, &mut seen_root)?;
                state.open(&e, depth)?;
                depth += 1;
            }
            Event::Empty(e) => {
                check_root(&e, root, depth, &mut seen_root)?;
                state.open(&e, depth)?;
                state.close(e.local_name().as_ref());
            }
            Event::End(e) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| parse_error("unexpected closing tag"))?;
                state.close(e.local_name().as_ref());
            }
            Event::Text(e) => {
                if state.collects_text() {
                    let text = e.unescape().map_err(parse_error)?;
                    state.push_text(&text);
                }
            }
            Event::CData(e) => {
                if state.collects_text() {
                    let text = reader.decoder().decode(&e).map_err(parse_error)?;
                    state.push_text(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(parse_error(format_args!("no `{root}` element")));
    }
    if depth > 0 {
        return Err(parse_error("unexpected end of document"));
    }
    Ok(state.records)
}

fn check_root(e: &BytesStart, root: &str, depth: usize, seen_root: &mut bool) -> Result<()> {
    if depth > 0 {
        return Ok(());
    }
    if *seen_root {
        return Err(parse_error("more than one root element"));
    }
    let name = e.local_name();
    if name.as_ref() != root.as_bytes() {
        return Err(parse_error(format_args!(
            "expected `{root}` root element, found `{}`",
            String::from_utf8_lossy(name.as_ref())
        )));
    }
    *seen_root = true;
    Ok(())
}

/// Records, the field and subfield being read, and any open leader.
#[derive(Default)]
struct ReadState {
    records: Vec<Record>,
    record: Option<Record>,
    leader: Option<String>,
    field: Option<Field>,
    subfield: Option<(Option<char>, String)>,
}

impl ReadState {
    /// A `record` opens at the root or directly under the collection.
    fn open(&mut self, e: &BytesStart, depth: usize) -> Result<()> {
        match e.local_name().as_ref() {
            b"record" if self.record.is_none() && depth <= 1 => {
                self.record = Some(Record::new());
            }
            b"leader" if self.record.is_some() && self.field.is_none() => {
                self.leader = Some(String::new());
            }
            b"datafield" if self.record.is_some() && self.field.is_none() => {
                let tag = attribute(e, "tag")?
                    .ok_or_else(|| parse_error("datafield without a tag attribute"))?;
                let ind1 = first_char(attribute(e, "ind1")?.as_deref());
                let ind2 = first_char(attribute(e, "ind2")?.as_deref());
                self.field = Some(Field::new(tag.into_owned(), ind1, ind2));
            }
            b"subfield" if self.field.is_some() && self.subfield.is_none() => {
                let code = attribute(e, "code")?.and_then(|code| code.chars().next());
                self.subfield = Some((code, String::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"subfield" => {
                if let (Some(field), Some((code, value))) =
                    (&mut self.field, self.subfield.take())
                {
                    match code {
                        Some(code) => field.add_subfield(code, value),
                        None => debug!(tag = %field.tag, "skipping subfield without code"),
                    }
                }
            }
            b"datafield" => {
                if let (Some(record), Some(field)) = (&mut self.record, self.field.take()) {
                    record.add_field(field);
                }
            }
            b"leader" => {
                if let (Some(record), Some(leader)) = (&mut self.record, self.leader.take()) {
                    record.leader = Some(leader).filter(|leader| !leader.is_empty());
                }
            }
            b"record" if self.field.is_none() => {
                if let Some(record) = self.record.take() {
                    self.records.push(record);
                }
            }
            _ => {}
        }
    }

    fn collects_text(&self) -> bool {
        self.subfield.is_some() || self.leader.is_some()
    }

    fn push_text(&mut self, text: &str) {
        if let Some((_, value)) = &mut self.subfield {
            value.push_str(text);
        } else if let Some(leader) = &mut self.leader {
            leader.push_str(text);
        }
    }
}

fn attribute<'a>(e: &'a BytesStart, name: &str) -> Result<Option<Cow<'a, str>>> {
    match e.try_get_attribute(name).map_err(parse_error)? {
        Some(attr) => Ok(Some(attr.unescape_value().map_err(parse_error)?)),
        None => Ok(None),
    }
}

fn first_char(value: Option<&str>) -> char {
    value.and_then(|v| v.chars().next()).unwrap_or(' ')
}

// ---------------------------------------------------------------------------
// Serialization: Record → MarcXchange
// ---------------------------------------------------------------------------

/// Write one `marcx:record` element, optionally declaring the namespace on it.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_record<W: Write>(
    writer: &mut Writer<W>,
    document: &MarcxDocument,
    declare_namespace: bool,
) -> Result<()> {
    let mut start = BytesStart::new("marcx:record");
    if declare_namespace {
        start.push_attribute(("xmlns:marcx", MARCX_NS));
    }
    start.push_attribute(("format", MARCX_FORMAT));
    start.push_attribute(("type", document.record_type.as_str()));
    writer.write_event(Event::Start(start))?;

    let leader = document.record.leader.as_deref().unwrap_or(DEFAULT_LEADER);
    writer.write_event(Event::Start(BytesStart::new("marcx:leader")))?;
    writer.write_event(Event::Text(BytesText::new(leader)))?;
    writer.write_event(Event::End(BytesEnd::new("marcx:leader")))?;

    for field in document.record.fields() {
        write_datafield(writer, field)?;
    }

    writer.write_event(Event::End(BytesEnd::new("marcx:record")))?;
    Ok(())
}

fn write_datafield<W: Write>(writer: &mut Writer<W>, field: &Field) -> Result<()> {
    let ind1 = field.indicator1.to_string();
    let ind2 = field.indicator2.to_string();

    let mut start = BytesStart::new("marcx:datafield");
    start.push_attribute(("tag", field.tag.as_str()));
    start.push_attribute(("ind1", ind1.as_str()));
    start.push_attribute(("ind2", ind2.as_str()));
    writer.write_event(Event::Start(start))?;

    for subfield in &field.subfields {
        let code = subfield.code.to_string();
        let mut element = BytesStart::new("marcx:subfield");
        element.push_attribute(("code", code.as_str()));

        if subfield.value.is_empty() {
            writer.write_event(Event::Empty(element))?;
        } else {
            writer.write_event(Event::Start(element))?;
            writer.write_event(Event::Text(BytesText::new(&subfield.value)))?;
            writer.write_event(Event::End(BytesEnd::new("marcx:subfield")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("marcx:datafield")))?;
    Ok(())
}

/// Write the standard XML declaration.
///
/// # Errors
///
/// Returns an error if the underlying writer fails.
pub fn write_declaration<W: Write>(writer: &mut Writer<W>) -> Result<()> {
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(())
}

/// Convert a writer's buffer into a `String`.
///
/// # Errors
///
/// Returns [`OaiError::SerializeError`] if the buffer is not valid UTF-8.
pub fn into_string(writer: Writer<Vec<u8>>) -> Result<String> {
    String::from_utf8(writer.into_inner())
        .map_err(|e| OaiError::SerializeError(format!("Output is not valid UTF-8: {e}")))
}

/// Serialize a single record as a standalone MarcXchange document.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn record_to_marcxchange(document: &MarcxDocument) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_record(&mut writer, document, true)?;
    into_string(writer)
}

/// Serialize records as a `marcx:collection`, in the given order.
///
/// The collection element carries the only namespace declaration.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn collection_to_marcxchange(
    documents: &[MarcxDocument],
    xml_declaration: bool,
) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    if xml_declaration {
        write_declaration(&mut writer)?;
    }

    let mut root = BytesStart::new("marcx:collection");
    root.push_attribute(("xmlns:marcx", MARCX_NS));
    writer.write_event(Event::Start(root))?;
    for document in documents {
        write_record(&mut writer, document, false)?;
    }
    writer.write_event(Event::End(BytesEnd::new("marcx:collection")))?;

    into_string(writer)
}
