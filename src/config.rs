//! Configuration options for formatting and set matching.
//!
//! This module provides the [`OutputFormat`] enum naming the metadata
//! formats a harvester may request, [`FormatterConfig`] controlling how
//! record hierarchies are rendered, and [`SetMatcherConfig`] controlling
//! which OAI sets are evaluated.

use std::fmt;
use std::str::FromStr;

use crate::error::OaiError;

/// Metadata format of a formatted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    /// Simple Dublin Core (`oai_dc`), mandatory for every OAI-PMH repository
    OaiDc,
    /// Sanitized MarcXchange collection (`marcx`)
    MarcX,
}

impl OutputFormat {
    /// Every supported format, in the order they are advertised
    pub const ALL: [OutputFormat; 2] = [OutputFormat::OaiDc, OutputFormat::MarcX];

    /// The metadata prefix for this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OaiDc => "oai_dc",
            Self::MarcX => "marcx",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OaiError;

    /// Metadata prefixes are matched exactly.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == s)
            .ok_or_else(|| OaiError::UnsupportedFormat(s.to_string()))
    }
}

/// The metadata prefixes a harvester may request.
#[must_use]
pub fn allowed_formats() -> Vec<&'static str> {
    OutputFormat::ALL.iter().map(OutputFormat::as_str).collect()
}

/// Configuration for record hierarchy formatting.
///
/// # Examples
///
/// ```
/// use marcx_oai::FormatterConfig;
///
/// let config = FormatterConfig::new().with_xml_declaration(true);
/// assert!(config.xml_declaration);
/// assert!(!config.strip_subfield_0_of_5xx);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Prefix every document with `<?xml version="1.0" encoding="UTF-8"?>`.
    ///
    /// Off by default, since the output is usually embedded in an OAI-PMH
    /// response envelope.
    pub xml_declaration: bool,

    /// Also drop subfield `0` from 5xx fields in `marcx` output.
    pub strip_subfield_0_of_5xx: bool,
}

impl FormatterConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the XML declaration.
    #[must_use]
    pub const fn with_xml_declaration(mut self, enabled: bool) -> Self {
        self.xml_declaration = enabled;
        self
    }

    /// Enables removal of subfield `0` from 5xx fields.
    #[must_use]
    pub const fn with_strip_subfield_0_of_5xx(mut self, enabled: bool) -> Self {
        self.strip_subfield_0_of_5xx = enabled;
        self
    }
}

/// Configuration for OAI set classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetMatcherConfig {
    /// Evaluate the BCI deposit set (published as `FDEPOT`).
    ///
    /// Off by default; the default classification yields only the four
    /// standard sets.
    pub include_bci: bool,
}

impl SetMatcherConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the BCI deposit set.
    #[must_use]
    pub const fn with_bci(mut self, enabled: bool) -> Self {
        self.include_bci = enabled;
        self
    }
}
