//! Dublin Core mapping of danMARC2 records.
//!
//! This module builds the simple Dublin Core (`oai_dc`) document that every
//! OAI-PMH repository must offer. Each Dublin Core element is produced by an
//! independent handler registered on the field tag it reads from:
//!
//! | Element        | Source                                            |
//! |----------------|---------------------------------------------------|
//! | `dc:title`     | 245 `a` (repeatable) then `g`, joined with `". "` |
//! | `dc:creator`   | 100 (person) or 110 (corporation)                 |
//! | `dc:contributor` | 700 (person) or 710 (corporation)               |
//! | `dc:publisher` | 260 `b`, one element per occurrence               |
//! | `dc:date`      | 008 `a`                                           |
//! | `dc:identifier`| 001 `b,a`; 021 `a`/`e` as ISBN; 022 `a` as ISSN   |
//! | `dc:source`    | 241 `a`                                           |
//! | `dc:language`  | 008 `l`                                           |
//! | `dc:relation`  | higher-level identifiers supplied by the caller   |
//!
//! Missing fields never cause errors; an empty value is simply not emitted.
//! Before serialization the elements are put into canonical order: by
//! element name, and within one name in reverse emission order.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::dublin_core::{build_dublin_core, DcElementName};
//! use marcx_oai::Record;
//!
//! let record = Record::from_line_format(
//!     "001 00 *a23645564 *b870970\n\
//!      100 00 *aMurakami *hHaruki\n\
//!      245 00 *aTraekopfuglens kroenike",
//! )?;
//!
//! let dc = build_dublin_core(&record, &[]);
//! assert_eq!(dc.first(DcElementName::Creator), Some("Haruki Murakami"));
//! assert_eq!(dc.first(DcElementName::Identifier), Some("870970,23645564"));
//!
//! let xml = dc.to_xml(false)?;
//! assert!(xml.contains("<dc:title>Traekopfuglens kroenike</dc:title>"));
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use std::fmt;

use lazy_static::lazy_static;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regex::Regex;
use tracing::{debug, trace};

use crate::error::Result;
use crate::field_map::FieldMap;
use crate::marcxchange::{into_string, write_declaration};
use crate::record::{Field, Record};

/// Namespace of the `oai_dc:dc` root element.
pub const OAI_DC_NS: &str = "http://www.openarchives.org/OAI/2.0/oai_dc/";

/// Dublin Core elements namespace.
pub const DC_NS: &str = "http://purl.org/dc/elements/1.1/";

/// XML Schema instance namespace.
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Schema location of the `oai_dc` format.
pub const OAI_DC_SCHEMA_LOCATION: &str =
    "http://www.openarchives.org/OAI/2.0/oai_dc/ http://www.openarchives.org/OAI/2.0/oai_dc.xsd";

const PERSON_ADDITION_CODES: &[char] = &['e', 'f'];
const CORPORATION_NAME_CODES: &[char] = &['a', 's'];
const CORPORATION_ADDITION_CODES: &[char] = &['e', 'c', 'i', 'k', 'j'];

lazy_static! {
    static ref UNWANTED_CHARACTERS: Regex = Regex::new(r"[\u{00A4}\[\]]").unwrap();
    static ref NON_PUBLISHER: Regex = Regex::new(r"(?i)i samarbejde med|i kommission hos").unwrap();
    static ref DC_FIELD_MAP: FieldMap<Vec<DcElement>> = dc_field_map();
}

/// Dublin Core elements produced from danMARC2 records.
///
/// Variants are declared in alphabetical order of their element names, so
/// the derived `Ord` is the canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DcElementName {
    /// dc:contributor - Entity responsible for making contributions to the resource
    Contributor,
    /// dc:creator - Entity primarily responsible for making the resource
    Creator,
    /// dc:date - Point or period of time associated with the resource
    Date,
    /// dc:identifier - Unambiguous reference to the resource
    Identifier,
    /// dc:language - Language of the resource
    Language,
    /// dc:publisher - Entity responsible for making the resource available
    Publisher,
    /// dc:relation - Related resource
    Relation,
    /// dc:source - Related resource from which the resource is derived
    Source,
    /// dc:title - Title of the resource
    Title,
}

impl DcElementName {
    /// Local element name, without prefix
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Contributor => "contributor",
            Self::Creator => "creator",
            Self::Date => "date",
            Self::Identifier => "identifier",
            Self::Language => "language",
            Self::Publisher => "publisher",
            Self::Relation => "relation",
            Self::Source => "source",
            Self::Title => "title",
        }
    }

    /// Prefixed element name as serialized, e.g. `dc:title`
    #[must_use]
    pub const fn qualified_name(&self) -> &'static str {
        match self {
            Self::Contributor => "dc:contributor",
            Self::Creator => "dc:creator",
            Self::Date => "dc:date",
            Self::Identifier => "dc:identifier",
            Self::Language => "dc:language",
            Self::Publisher => "dc:publisher",
            Self::Relation => "dc:relation",
            Self::Source => "dc:source",
            Self::Title => "dc:title",
        }
    }
}

impl fmt::Display for DcElementName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.qualified_name())
    }
}

/// A single Dublin Core element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DcElement {
    /// Element name
    pub name: DcElementName,
    /// Text content
    pub value: String,
}

impl DcElement {
    /// Create an element
    #[must_use]
    pub fn new(name: DcElementName, value: impl Into<String>) -> Self {
        DcElement {
            name,
            value: value.into(),
        }
    }
}

/// A Dublin Core document with elements in canonical order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DcDocument {
    elements: Vec<DcElement>,
}

impl DcDocument {
    /// Build a document from elements in emission order.
    ///
    /// Elements are sorted by name; elements sharing a name end up in
    /// reverse emission order.
    #[must_use]
    pub fn from_emitted(mut elements: Vec<DcElement>) -> Self {
        elements.reverse();
        elements.sort_by_key(|element| element.name);
        DcDocument { elements }
    }

    /// Elements in canonical order
    #[must_use]
    pub fn elements(&self) -> &[DcElement] {
        &self.elements
    }

    /// Values of every element with the given name, in canonical order
    pub fn values(&self, name: DcElementName) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter(move |e| e.name == name)
            .map(|e| e.value.as_str())
    }

    /// Value of the first element with the given name
    #[must_use]
    pub fn first(&self, name: DcElementName) -> Option<&str> {
        self.values(name).next()
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the document has no elements
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Serialize as an `oai_dc:dc` document.
    ///
    /// # Errors
    ///
    /// Returns an error if the XML writer fails.
    pub fn to_xml(&self, xml_declaration: bool) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        if xml_declaration {
            write_declaration(&mut writer)?;
        }

        let mut root = BytesStart::new("oai_dc:dc");
        root.push_attribute(("xmlns:oai_dc", OAI_DC_NS));
        root.push_attribute(("xmlns:dc", DC_NS));
        root.push_attribute(("xmlns:xsi", XSI_NS));
        root.push_attribute(("xsi:schemaLocation", OAI_DC_SCHEMA_LOCATION));
        writer.write_event(Event::Start(root))?;

        for element in &self.elements {
            let name = element.name.qualified_name();
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            writer.write_event(Event::Text(BytesText::new(&element.value)))?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }

        writer.write_event(Event::End(BytesEnd::new("oai_dc:dc")))?;
        into_string(writer)
    }
}

/// Build the Dublin Core document for `record`.
///
/// `higher_level_identifiers` become `dc:relation` elements in the given
/// order; empty identifiers are skipped.
#[tracing::instrument(skip_all, fields(relations = higher_level_identifiers.len()))]
#[must_use]
pub fn build_dublin_core(record: &Record, higher_level_identifiers: &[String]) -> DcDocument {
    let mut emitted = Vec::new();
    DC_FIELD_MAP.apply(record, &mut emitted);

    emitted.extend(
        higher_level_identifiers
            .iter()
            .filter(|id| !id.is_empty())
            .map(|id| DcElement::new(DcElementName::Relation, id.as_str())),
    );

    let document = DcDocument::from_emitted(emitted);
    debug!(elements = document.len(), "mapped record to Dublin Core");
    document
}

/// Remove currency signs (`¤`) and square brackets, then trim surrounding whitespace.
///
/// # Examples
///
/// ```
/// use marcx_oai::dublin_core::remove_unwanted_characters;
///
/// assert_eq!(remove_unwanted_characters(" En \u{a4}smule [haab] "), "En smule haab");
/// ```
#[must_use]
pub fn remove_unwanted_characters(value: &str) -> String {
    let cleaned = UNWANTED_CHARACTERS.replace_all(value, "");
    let cleaned = cleaned.trim();
    if cleaned != value {
        trace!(from = value, to = cleaned, "removed unwanted characters");
    }
    cleaned.to_string()
}

fn push_cleaned(out: &mut Vec<DcElement>, name: DcElementName, value: &str) {
    let cleaned = remove_unwanted_characters(value);
    if !cleaned.is_empty() {
        out.push(DcElement::new(name, cleaned));
    }
}

fn push_verbatim(out: &mut Vec<DcElement>, name: DcElementName, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        out.push(DcElement::new(name, value));
    }
}

/// Forename, surname and the `e`/`f` additions, e.g. "Margrethe II dronning af Danmark".
fn person_name(field: &Field) -> String {
    let name = [field.get_subfield('h'), field.get_subfield('a')]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let addition = field.join_values(PERSON_ADDITION_CODES, " ");
    match (name.is_empty(), addition.is_empty()) {
        (_, true) => name,
        (true, false) => addition,
        (false, false) => format!("{name} {addition}"),
    }
}

fn corporation_name(field: &Field) -> String {
    format!(
        "{} {}",
        field.join_values(CORPORATION_NAME_CODES, ""),
        field.join_values(CORPORATION_ADDITION_CODES, " ")
    )
}

fn register_agents(
    map: &mut FieldMap<Vec<DcElement>>,
    name: DcElementName,
    person_tag: &str,
    corporation_tag: &str,
) {
    map.put(person_tag, move |field, out| {
        push_cleaned(out, name, &person_name(field));
    });
    map.put(corporation_tag, move |field, out| {
        push_cleaned(out, name, &corporation_name(field));
    });
}

fn dc_field_map() -> FieldMap<Vec<DcElement>> {
    let mut map = FieldMap::new();

    map.put("245", |field, out| {
        let title = field
            .subfields_by_code('a')
            .chain(field.subfields_by_code('g'))
            .collect::<Vec<_>>()
            .join(". ");
        push_cleaned(out, DcElementName::Title, &title);
    });

    register_agents(&mut map, DcElementName::Creator, "100", "110");

    map.put("260", |field, out| {
        for publisher in field.subfields_by_code('b') {
            if publisher.is_empty() || NON_PUBLISHER.is_match(publisher) {
                trace!(publisher, "skipping publisher");
                continue;
            }
            push_cleaned(out, DcElementName::Publisher, publisher);
        }
    });

    register_agents(&mut map, DcElementName::Contributor, "700", "710");

    map.put("008", |field, out| {
        push_verbatim(out, DcElementName::Date, field.get_subfield('a'));
    });

    map.put("001", |field, out| {
        if let (Some(id), Some(agency)) = (field.get_subfield('a'), field.get_subfield('b')) {
            if !id.is_empty() && !agency.is_empty() {
                out.push(DcElement::new(
                    DcElementName::Identifier,
                    format!("{agency},{id}"),
                ));
            }
        }
    });

    map.put("021", |field, out| {
        for isbn in field.values_matching(&['a', 'e']) {
            out.push(DcElement::new(DcElementName::Identifier, format!("ISBN:{isbn}")));
        }
    });

    map.put("022", |field, out| {
        for issn in field.subfields_by_code('a') {
            out.push(DcElement::new(DcElementName::Identifier, format!("ISSN:{issn}")));
        }
    });

    map.put("241", |field, out| {
        if let Some(source) = field.get_subfield('a') {
            push_cleaned(out, DcElementName::Source, source);
        }
    });

    map.put("008", |field, out| {
        push_verbatim(out, DcElementName::Language, field.get_subfield('l'));
    });

    map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dc(lines: &str) -> DcDocument {
        build_dublin_core(&Record::from_line_format(lines).unwrap(), &[])
    }

    fn values(doc: &DcDocument, name: DcElementName) -> Vec<&str> {
        doc.values(name).collect()
    }

    #[test]
    fn test_title_joins_a_then_g() {
        let doc = dc("245 00*aGlem det*aDaarligt nyt*aEn \u{a4}smule haab*\u{f8}MagnaPrintserien");
        assert_eq!(
            values(&doc, DcElementName::Title),
            vec!["Glem det. Daarligt nyt. En smule haab"]
        );

        let doc = dc("245 00 *g2.1 *aIntern sikkerhedsdokumentation");
        assert_eq!(
            values(&doc, DcElementName::Title),
            vec!["Intern sikkerhedsdokumentation. 2.1"]
        );

        let doc = dc("245 00 *gDisc four");
        assert_eq!(values(&doc, DcElementName::Title), vec!["Disc four"]);
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_title_omitted_when_empty_after_cleaning() {
        let doc = dc("245 00 *a[\u{a4}]");
        assert!(doc.is_empty());
        assert!(dc("245 00 *eHaruki Murakami").is_empty());
    }

    #[test]
    fn test_person_names() {
        let cases = [
            ("100 00 *aNoerholm *hMorten", "Morten Noerholm"),
            ("100 00 *aAndersen *hH. C. *cf. 1805", "H. C. Andersen"),
            ("100 00 *aTherese *faf Lisieux", "Therese af Lisieux"),
            ("100 00 *aRomanoff *hRoman *fprins", "Roman Romanoff prins"),
            (
                "100 00 *aMargrethe *E2 *eII *fdronning af Danmark",
                "Margrethe II dronning af Danmark",
            ),
        ];
        for (line, expected) in cases {
            assert_eq!(values(&dc(line), DcElementName::Creator), vec![expected], "{line}");
        }
    }

    #[test]
    fn test_corporation_names() {
        let doc = dc("110 00 *sRoskilde amt *cRegionplanafdelingen");
        assert_eq!(
            values(&doc, DcElementName::Creator),
            vec!["Roskilde amt Regionplanafdelingen"]
        );

        let doc = dc("710 00 *cIndenrigsministeriet");
        assert_eq!(
            values(&doc, DcElementName::Contributor),
            vec!["Indenrigsministeriet"]
        );

        assert!(dc("710 00 *0").is_empty());
    }

    #[test]
    fn test_publishers() {
        let doc = dc(
            "260 00 *aKbh. *bGyldendal *bi samarbejde med Dansk Sprognaevn *b\n\
             260 00 *bI kommission hos Busck *b[Eget forlag]",
        );
        assert_eq!(
            values(&doc, DcElementName::Publisher),
            vec!["Eget forlag", "Gyldendal"]
        );
    }

    #[test]
    fn test_008_feeds_date_and_language() {
        let doc = dc("008 00 *tm *a???? *ldan");
        assert_eq!(values(&doc, DcElementName::Date), vec!["????"]);
        assert_eq!(values(&doc, DcElementName::Language), vec!["dan"]);
    }

    #[test]
    fn test_identifiers() {
        let doc = dc(
            "001 00 *a23645564 *b870970\n\
             021 00 *a87-7724-857-0 *e9788777248570\n\
             022 00 *a0105-1113",
        );
        assert_eq!(
            values(&doc, DcElementName::Identifier),
            vec![
                "ISSN:0105-1113",
                "ISBN:9788777248570",
                "ISBN:87-7724-857-0",
                "870970,23645564",
            ]
        );

        assert!(dc("001 00 *a23645564").is_empty());
    }

    #[test]
    fn test_source_is_cleaned() {
        let doc = dc("241 00 *a[Nejimaki-dori kuronikure] *uhttp://example.org");
        assert_eq!(
            values(&doc, DcElementName::Source),
            vec!["Nejimaki-dori kuronikure"]
        );
    }

    #[test]
    fn test_relations_keep_given_order_before_sorting() {
        let record = Record::from_line_format("001 00 *a23642468 *b870970").unwrap();
        let ids = vec![
            "870970,23642433".to_string(),
            String::new(),
            "870970,23641348".to_string(),
        ];
        let doc = build_dublin_core(&record, &ids);
        assert_eq!(
            values(&doc, DcElementName::Relation),
            vec!["870970,23641348", "870970,23642433"]
        );
    }

    #[test]
    fn test_canonical_order() {
        let doc = dc(
            "001 00 *a23642468 *b870970\n\
             008 00 *a2001 *ldan\n\
             245 00 *g2.1 *aIntern sikkerhedsdokumentation\n\
             700 00 *0 *aGram *hAnne\n\
             710 00 *aHolstberg Management",
        );
        let order: Vec<(&str, &str)> = doc
            .elements()
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("contributor", "Holstberg Management"),
                ("contributor", "Anne Gram"),
                ("date", "2001"),
                ("identifier", "870970,23642468"),
                ("language", "dan"),
                ("title", "Intern sikkerhedsdokumentation. 2.1"),
            ]
        );
    }

    #[test]
    fn test_to_xml() {
        let doc = dc(
            "001 00 *a23645564 *b870970\n\
             260 00 *bR&D Forlag",
        );
        let xml = doc.to_xml(false).unwrap();
        assert_eq!(
            xml,
            "<oai_dc:dc xmlns:oai_dc=\"http://www.openarchives.org/OAI/2.0/oai_dc/\" \
             xmlns:dc=\"http://purl.org/dc/elements/1.1/\" \
             xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" \
             xsi:schemaLocation=\"http://www.openarchives.org/OAI/2.0/oai_dc/ http://www.openarchives.org/OAI/2.0/oai_dc.xsd\">\
             <dc:identifier>870970,23645564</dc:identifier>\
             <dc:publisher>R&amp;D Forlag</dc:publisher>\
             </oai_dc:dc>"
        );

        let with_declaration = doc.to_xml(true).unwrap();
        assert!(with_declaration.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    }

    #[test]
    fn test_remove_unwanted_characters_keeps_inner_whitespace() {
        assert_eq!(remove_unwanted_characters("  [a]  b \u{a4} "), "a  b");
        assert_eq!(remove_unwanted_characters(""), "");
    }
}
