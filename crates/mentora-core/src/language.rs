//! Language labels used across the pipeline.
//!
//! Labels are always human-readable language names (`"Persian"`,
//! `"English"`) or one of the two sentinels `English` / `Unknown` - never a
//! raw locale code. Detectors that work with ISO codes go through
//! [`LanguageLabel::from_iso_code`] so the normalization lives in one place.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical working language of the pipeline.
pub const WORKING_LANGUAGE: &str = "English";

/// The detected language of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageLabel {
    /// The working language.
    English,
    /// Detection produced no usable result.
    Unknown,
    /// Any other language, by its English name (e.g. `"Persian"`).
    Named(String),
}

impl LanguageLabel {
    /// Builds a label from a free-form language name.
    ///
    /// `"english"` (any casing) collapses to [`LanguageLabel::English`],
    /// `"unknown"` to [`LanguageLabel::Unknown`]; anything else is kept as a
    /// trimmed name. Empty input maps to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Self::Unknown;
        }
        match trimmed.to_lowercase().as_str() {
            "english" => Self::English,
            "unknown" => Self::Unknown,
            _ => Self::Named(trimmed.to_string()),
        }
    }

    /// Maps an ISO 639-1 code to a label.
    ///
    /// `en` maps to `English`; other known codes map to their English
    /// language name; codes outside the table pass through as the label.
    pub fn from_iso_code(code: &str) -> Self {
        let code = code.trim().to_lowercase();
        match code.as_str() {
            "en" => Self::English,
            "fa" => Self::Named("Persian".to_string()),
            "ar" => Self::Named("Arabic".to_string()),
            "fr" => Self::Named("French".to_string()),
            "es" => Self::Named("Spanish".to_string()),
            "de" => Self::Named("German".to_string()),
            "it" => Self::Named("Italian".to_string()),
            "pt" => Self::Named("Portuguese".to_string()),
            "ru" => Self::Named("Russian".to_string()),
            "tr" => Self::Named("Turkish".to_string()),
            "zh" => Self::Named("Chinese".to_string()),
            "ja" => Self::Named("Japanese".to_string()),
            "ko" => Self::Named("Korean".to_string()),
            "hi" => Self::Named("Hindi".to_string()),
            "el" => Self::Named("Greek".to_string()),
            "he" => Self::Named("Hebrew".to_string()),
            "th" => Self::Named("Thai".to_string()),
            "" => Self::Unknown,
            other => Self::Named(other.to_string()),
        }
    }

    /// Whether the label names the working language, case-insensitively.
    pub fn is_english(&self) -> bool {
        match self {
            Self::English => true,
            Self::Unknown => false,
            Self::Named(name) => name.eq_ignore_ascii_case(WORKING_LANGUAGE),
        }
    }

    /// Whether detection produced no usable result.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// The label as shown to users and stored on records.
    pub fn as_str(&self) -> &str {
        match self {
            Self::English => "English",
            Self::Unknown => "Unknown",
            Self::Named(name) => name.as_str(),
        }
    }
}

impl fmt::Display for LanguageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LanguageLabel {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LanguageLabel {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_normalizes_the_sentinels() {
        assert_eq!(LanguageLabel::from_name("English"), LanguageLabel::English);
        assert_eq!(LanguageLabel::from_name("ENGLISH"), LanguageLabel::English);
        assert_eq!(LanguageLabel::from_name("unknown"), LanguageLabel::Unknown);
        assert_eq!(LanguageLabel::from_name(""), LanguageLabel::Unknown);
        assert_eq!(
            LanguageLabel::from_name(" Persian "),
            LanguageLabel::Named("Persian".to_string())
        );
    }

    #[test]
    fn iso_codes_map_to_names() {
        assert_eq!(LanguageLabel::from_iso_code("en"), LanguageLabel::English);
        assert_eq!(LanguageLabel::from_iso_code("fa").as_str(), "Persian");
        // Unmapped codes pass through rather than erroring.
        assert_eq!(LanguageLabel::from_iso_code("xx").as_str(), "xx");
    }

    #[test]
    fn is_english_is_case_insensitive() {
        assert!(LanguageLabel::English.is_english());
        assert!(LanguageLabel::Named("english".to_string()).is_english());
        assert!(!LanguageLabel::Named("Persian".to_string()).is_english());
        assert!(!LanguageLabel::Unknown.is_english());
    }

    #[test]
    fn serde_round_trips_as_plain_strings() {
        let json = serde_json::to_string(&LanguageLabel::Named("Persian".to_string())).unwrap();
        assert_eq!(json, "\"Persian\"");
        let back: LanguageLabel = serde_json::from_str("\"English\"").unwrap();
        assert_eq!(back, LanguageLabel::English);
    }
}
