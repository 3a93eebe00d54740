//! OAI set classification.
//!
//! Each record is placed in zero or more OAI sets, which decide the
//! harvesters that may see it:
//!
//! | Set    | Rule                                                                 |
//! |--------|----------------------------------------------------------------------|
//! | `NAT`  | agency 870970 or 870971 and at least one catalogue code in 032 `a`   |
//! | `BKM`  | agency 870970 and a BKM code family (`BKM`, `SFD`, `ACC`, ...) in 032 `x` |
//! | `ART`  | agency 870971 and no 014 `x` = `ANM` (reviews are not articles)      |
//! | `ONL`  | agency 870970 and online-available: see [`OaiSetSignals::is_part_of_onl`] |
//! | `FDEPOT` | opt-in: agency 870970, 001 `b` = 870970 and 996 `a` = 700300       |
//!
//! Catalogue codes in field 032 carry a date suffix (`DBF200338`); only the
//! letters are compared. The code families are declared as data below so
//! they can be checked against the cataloguing rules on their own.
//!
//! # Examples
//!
//! ```
//! use marcx_oai::set_matcher::{classify_record, OaiSet};
//! use marcx_oai::{Record, SetMatcherConfig};
//!
//! let record = Record::from_line_format(
//!     "001 00 *a23645564 *b870970\n\
//!      009 00 *aa *gxx\n\
//!      032 00 *aDBF200338 *xSFD200338 *xACC200134",
//! )?;
//!
//! let sets = classify_record(870970, &record, &SetMatcherConfig::default());
//! assert_eq!(sets, vec![OaiSet::Nat, OaiSet::Bkm]);
//! # Ok::<(), marcx_oai::OaiError>(())
//! ```

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::config::SetMatcherConfig;
use crate::error::Result;
use crate::marcxchange::parse_record;
use crate::record::Record;

/// Agency of the national bibliography (DBC).
pub const AGENCY_NATIONAL: u32 = 870_970;

/// Agency of the article database.
pub const AGENCY_ARTICLES: u32 = 870_971;

/// Agencies whose records can belong to any set.
pub const ELIGIBLE_AGENCIES: &[u32] = &[AGENCY_NATIONAL, AGENCY_ARTICLES];

/// 032 `x` code families that place a record in BKM, as anchored patterns.
pub const BKM_CODE_FAMILIES: &[&str] = &["BK[MRX]", "SF.", "AC.", "INV", "UTI", "NET"];

/// Codes marking an online-available record when 009 `g` or 856 `u` say it is online.
pub const ONLINE_CODES: &[&str] = &["DBF", "DPF", "BKM", "DAT", "NEP", "SNE", "IDU"];

/// Code marking a record as digitally available.
pub const DIGITAL_CODE: &str = "DAT";

/// Codes that, together with [`DIGITAL_CODE`], mark an online-available record.
pub const DIGITAL_COMPANION_CODES: &[&str] = &["IDO", "IDP", "NEP", "NET", "SNE"];

/// 009 `g` value for online material.
pub const ONLINE_MATERIAL: &str = "xe";

/// 014 `x` value marking a review.
pub const REVIEW_MARKER: &str = "ANM";

/// 996 `a` value of the BCI deposit library.
pub const BCI_DEPOSIT_LIBRARY: &str = "700300";

lazy_static! {
    static ref BKM_CODE: Regex =
        Regex::new(&format!("(?i)^({})", BKM_CODE_FAMILIES.join("|"))).unwrap();
}

/// An OAI set a record can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OaiSet {
    /// National bibliography
    Nat,
    /// BKM (Bibliotekernes Kataloglevering) subscribers
    Bkm,
    /// Articles
    Art,
    /// Online-available material
    Onl,
    /// BCI deposit, published as `FDEPOT`
    Bci,
}

impl OaiSet {
    /// Published set name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nat => "NAT",
            Self::Bkm => "BKM",
            Self::Art => "ART",
            Self::Onl => "ONL",
            Self::Bci => "FDEPOT",
        }
    }
}

impl fmt::Display for OaiSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether records of `agency_id` can belong to any set.
#[must_use]
pub fn is_eligible(agency_id: u32) -> bool {
    ELIGIBLE_AGENCIES.contains(&agency_id)
}

/// The values of a record that set membership depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OaiSetSignals {
    /// Agency owning the record
    pub agency_id: u32,
    /// Values of 001 `b`
    pub values_of_001b: Vec<String>,
    /// Values of 009 `g`
    pub values_of_009g: Vec<String>,
    /// Values of 014 `x`
    pub values_of_014x: Vec<String>,
    /// Letters of each 032 `a` code, duplicates kept
    pub codes_in_032a: Vec<String>,
    /// Letters of each 032 `x` code, duplicates kept
    pub codes_in_032x: Vec<String>,
    /// Whether any 856 `u` is non-empty
    pub exist_856u: bool,
    /// Values of 996 `a`
    pub values_of_996a: Vec<String>,
}

impl OaiSetSignals {
    /// Collect the signals of `record`.
    #[must_use]
    pub fn from_record(agency_id: u32, record: &Record) -> Self {
        let values = |tag: &str, code: char| -> Vec<String> {
            record.values(tag, code).map(String::from).collect()
        };
        let codes = |tag: &str, code: char| -> Vec<String> {
            record.values(tag, code).map(catalogue_code).collect()
        };

        OaiSetSignals {
            agency_id,
            values_of_001b: values("001", 'b'),
            values_of_009g: values("009", 'g'),
            values_of_014x: values("014", 'x'),
            codes_in_032a: codes("032", 'a'),
            codes_in_032x: codes("032", 'x'),
            exist_856u: record.values("856", 'u').any(|u| !u.is_empty()),
            values_of_996a: values("996", 'a'),
        }
    }

    /// National bibliography: an eligible agency and some 032 `a` code.
    #[must_use]
    pub fn is_part_of_nat(&self) -> bool {
        is_eligible(self.agency_id) && !self.codes_in_032a.is_empty()
    }

    /// BKM: the national agency and a BKM code family in 032 `x`.
    #[must_use]
    pub fn is_part_of_bkm(&self) -> bool {
        self.agency_id == AGENCY_NATIONAL && self.codes_in_032x.iter().any(|c| BKM_CODE.is_match(c))
    }

    /// Articles: the article agency, unless a 014 `x` marks the record as a review.
    #[must_use]
    pub fn is_part_of_art(&self) -> bool {
        self.agency_id == AGENCY_ARTICLES && !self.values_of_014x.iter().any(|x| x == REVIEW_MARKER)
    }

    /// Online material, for the national agency only.
    ///
    /// A record is online when it is marked online (009 `g` = `xe`, or a
    /// non-empty 856 `u`) and carries one of [`ONLINE_CODES`], or when it
    /// carries [`DIGITAL_CODE`] together with one of
    /// [`DIGITAL_COMPANION_CODES`]. Codes from 032 `a` and `x` are compared
    /// without regard to case.
    #[must_use]
    pub fn is_part_of_onl(&self) -> bool {
        if self.agency_id != AGENCY_NATIONAL {
            return false;
        }

        let marked_online =
            self.values_of_009g.iter().any(|g| g == ONLINE_MATERIAL) || self.exist_856u;
        if marked_online && self.has_any_code(ONLINE_CODES) {
            return true;
        }

        self.has_any_code(&[DIGITAL_CODE]) && self.has_any_code(DIGITAL_COMPANION_CODES)
    }

    /// BCI deposit: the national agency, 001 `b` = 870970 and 996 `a` = 700300.
    #[must_use]
    pub fn is_part_of_bci(&self) -> bool {
        self.agency_id == AGENCY_NATIONAL
            && self
                .values_of_001b
                .iter()
                .any(|b| b == &AGENCY_NATIONAL.to_string())
            && self.values_of_996a.iter().any(|a| a == BCI_DEPOSIT_LIBRARY)
    }

    fn all_codes(&self) -> impl Iterator<Item = &str> {
        self.codes_in_032a
            .iter()
            .chain(&self.codes_in_032x)
            .map(String::as_str)
    }

    fn has_any_code(&self, wanted: &[&str]) -> bool {
        self.all_codes()
            .any(|code| wanted.iter().any(|w| code.eq_ignore_ascii_case(w)))
    }

    /// Sets this record belongs to, in the order NAT, BKM, ART, ONL (then FDEPOT if enabled).
    #[must_use]
    pub fn matching_sets(&self, config: &SetMatcherConfig) -> Vec<OaiSet> {
        let rules: [(OaiSet, bool); 5] = [
            (OaiSet::Nat, self.is_part_of_nat()),
            (OaiSet::Bkm, self.is_part_of_bkm()),
            (OaiSet::Art, self.is_part_of_art()),
            (OaiSet::Onl, self.is_part_of_onl()),
            (OaiSet::Bci, config.include_bci && self.is_part_of_bci()),
        ];
        rules
            .into_iter()
            .filter_map(|(set, matched)| matched.then_some(set))
            .collect()
    }
}

/// Letters of a catalogue code: digits removed, surrounding whitespace trimmed.
fn catalogue_code(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_ascii_digit())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Classify a raw MarcXchange record with the default configuration.
///
/// Records of ineligible agencies yield no sets and are not parsed.
///
/// # Errors
///
/// Returns [`crate::OaiError::ParseError`] if the record of an eligible
/// agency cannot be parsed.
pub fn classify(agency_id: u32, content: &str) -> Result<Vec<OaiSet>> {
    classify_with_config(agency_id, content, &SetMatcherConfig::default())
}

/// Classify a raw MarcXchange record.
///
/// # Errors
///
/// See [`classify`].
#[tracing::instrument(skip(content, config), fields(len = content.len()))]
pub fn classify_with_config(
    agency_id: u32,
    content: &str,
    config: &SetMatcherConfig,
) -> Result<Vec<OaiSet>> {
    if !is_eligible(agency_id) {
        debug!("agency not eligible for OAI sets");
        return Ok(Vec::new());
    }
    let record = parse_record(content)?;
    Ok(classify_record(agency_id, &record, config))
}

/// Classify a parsed record.
#[must_use]
pub fn classify_record(agency_id: u32, record: &Record, config: &SetMatcherConfig) -> Vec<OaiSet> {
    if !is_eligible(agency_id) {
        return Vec::new();
    }
    let sets = OaiSetSignals::from_record(agency_id, record).matching_sets(config);
    debug!(?sets, "classified record");
    sets
}
