//! Common fixtures shared across the integration tests.

#![allow(dead_code)]

use marcx_oai::{retype, ChildRef, HierarchyEntry, Record};

/// Volume of a three-level hierarchy; 014 points at [`SECTION`].
pub const VOLUME: &str = "001 00 *a23642468 *b870970\n\
    004 00 *rn *ab\n\
    008 00 *a2001 *ldan\n\
    014 00 *a23642433\n\
    245 00 *g2.1 *aIntern sikkerhedsdokumentation\n\
    700 00 *0 *aGram *hAnne\n\
    710 00 *aHolstberg Management";

/// Section of a three-level hierarchy; 014 points at [`HEAD`].
pub const SECTION: &str = "001 00 *a23642433 *b870970\n\
    004 00 *rn *as\n\
    014 00 *a23641348\n\
    245 00 *aSikkerhedsdokumentation";

/// Head of a three-level hierarchy.
pub const HEAD: &str = "001 00 *a23641348 *b870970\n\
    004 00 *rn *ah\n\
    245 00 *aSikkerhedsstyring";

/// A single record carrying BKM data and local data.
pub const BKM_RECORD: &str = "001 00 *a23645564 *b870970\n\
    004 00 *rn *ae\n\
    032 00 *aDBF200338 *xBKM200338\n\
    241 00 *aNejimaki-dori kuronikuru *uJapansk\n\
    245 00 *aTraekopfuglens kroenike\n\
    504 00 *&1 *aLaeselysten\n\
    520 00 *aRoman *0\n\
    665 00 *qJapan\n\
    d08 00 *aLokal note\n\
    s10 00 *aDBC";

/// Route library spans to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Parse a record written in line format.
pub fn record(lines: &str) -> Record {
    Record::from_line_format(lines).expect("fixture must be valid line format")
}

/// Serialize a line-format record as a standalone MarcXchange document.
pub fn marcx(lines: &str) -> String {
    marcx_oai::record_to_marcxchange(&retype(record(lines))).expect("fixture must serialize")
}

/// The volume, section and head hierarchy, narrowest first, with child links.
pub fn three_level_hierarchy() -> Vec<HierarchyEntry> {
    vec![
        HierarchyEntry::new(marcx(VOLUME)),
        HierarchyEntry::new(marcx(SECTION)).with_child(ChildRef::new("23642468", 870_970)),
        HierarchyEntry::new(marcx(HEAD)).with_child(ChildRef::new("23642433", 870_970)),
    ]
}

/// Record of the national bibliography with BKM catalogue codes.
pub const NAT_BKM_RECORD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<marcx:record xmlns:marcx="info:lc/xmlns/marcxchange-v1" format="danMARC2" type="Bibliographic">
    <marcx:leader>00000n    2200000   4500</marcx:leader>
    <marcx:datafield ind1="0" ind2="0" tag="001">
        <marcx:subfield code="a">23645564</marcx:subfield>
        <marcx:subfield code="b">870970</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="004">
        <marcx:subfield code="r">n</marcx:subfield>
        <marcx:subfield code="a">e</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="009">
        <marcx:subfield code="a">a</marcx:subfield>
        <marcx:subfield code="g">xx</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="032">
        <marcx:subfield code="a">DBF200338</marcx:subfield>
        <marcx:subfield code="x">SFD200338</marcx:subfield>
        <marcx:subfield code="x">ACC200134</marcx:subfield>
        <marcx:subfield code="x">ACC200332</marcx:subfield>
        <marcx:subfield code="x">DAT201623</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="100">
        <marcx:subfield code="a">Murakami</marcx:subfield>
        <marcx:subfield code="h">Haruki</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="245">
        <marcx:subfield code="a">Traekopfuglens kroenike</marcx:subfield>
    </marcx:datafield>
</marcx:record>"#;

/// Article record in agency 870971.
pub const ARTICLE_RECORD: &str = r#"<marcx:record xmlns:marcx="info:lc/xmlns/marcxchange-v1">
    <marcx:datafield ind1="0" ind2="0" tag="001">
        <marcx:subfield code="a">36007761</marcx:subfield>
        <marcx:subfield code="b">870971</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="004">
        <marcx:subfield code="r">n</marcx:subfield>
        <marcx:subfield code="a">i</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="009">
        <marcx:subfield code="a">a</marcx:subfield>
        <marcx:subfield code="g">xe</marcx:subfield>
        <marcx:subfield code="g">xx</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="014">
        <marcx:subfield code="a">49375395</marcx:subfield>
    </marcx:datafield>
    <marcx:datafield ind1="0" ind2="0" tag="032">
        <marcx:subfield code="a">ABU201619</marcx:subfield>
        <marcx:subfield code="a">DAR201416</marcx:subfield>
        <marcx:subfield code="x">ARK201619</marcx:subfield>
    </marcx:datafield>
</marcx:record>"#;

/// Online material of the national bibliography.
pub const ONLINE_RECORD: &str = r#"<record xmlns="info:lc/xmlns/marcxchange-v1">
    <datafield ind1="0" ind2="0" tag="001">
        <subfield code="a">26848806</subfield>
        <subfield code="b">870970</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="009">
        <subfield code="a">a</subfield>
        <subfield code="g">xe</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="032">
        <subfield code="a">IDO200731</subfield>
        <subfield code="x">NET200731</subfield>
        <subfield code="x">ACC200730</subfield>
        <subfield code="x">DIT990737</subfield>
        <subfield code="x">DAT201701</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="245">
        <subfield code="a">De &#164;gode mennesker i &#197;rhus</subfield>
    </datafield>
</record>"#;

/// Record deposited by the BCI library; no standard set applies.
pub const BCI_RECORD: &str = r#"<record xmlns="info:lc/xmlns/marcxchange-v1">
    <leader>00000nae  22000001  4500</leader>
    <datafield ind1="0" ind2="0" tag="001">
        <subfield code="a">47666813</subfield>
        <subfield code="b">870970</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="009">
        <subfield code="a">a</subfield>
        <subfield code="g">xx</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="245">
        <subfield code="a">B&#299;triks</subfield>
    </datafield>
    <datafield ind1="0" ind2="0" tag="996">
        <subfield code="a">700300</subfield>
    </datafield>
</record>"#;
