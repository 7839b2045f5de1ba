/// Comparator library - primitive value comparisons
///
/// This module handles:
/// - Locale-aware text collation (ICU4X collator)
/// - Numeric comparison with zero-coercion of unreadable values
use crate::types::{number_of, text_of};
use icu_collator::options::{CaseLevel, CollatorOptions, Strength};
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::Locale;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Collation locale used when none is configured
pub const DEFAULT_LOCALE: &str = "id";

/// Collation sensitivity used when none is configured
pub const DEFAULT_SENSITIVITY: Sensitivity = Sensitivity::Base;

/// Which differences between strings are significant when collating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sensitivity {
    /// Only base letters differ: "a" = "A" = "á"
    #[default]
    Base,
    /// Base letters and accents: "a" = "A", "a" != "á"
    Accent,
    /// Base letters and case: "a" = "á", "a" != "A"
    Case,
    /// Everything: "a", "A" and "á" are all distinct
    Variant,
}

impl Sensitivity {
    fn collator_options(self) -> CollatorOptions {
        let mut options = CollatorOptions::default();
        match self {
            Sensitivity::Base => {
                options.strength = Some(Strength::Primary);
            }
            Sensitivity::Accent => {
                options.strength = Some(Strength::Secondary);
            }
            Sensitivity::Case => {
                options.strength = Some(Strength::Primary);
                options.case_level = Some(CaseLevel::On);
            }
            Sensitivity::Variant => {
                options.strength = Some(Strength::Tertiary);
            }
        }
        options
    }
}

impl FromStr for Sensitivity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(Sensitivity::Base),
            "accent" => Ok(Sensitivity::Accent),
            "case" => Ok(Sensitivity::Case),
            "variant" => Ok(Sensitivity::Variant),
            other => Err(format!("Unknown sensitivity '{}' (expected base, accent, case or variant)", other)),
        }
    }
}

impl fmt::Display for Sensitivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sensitivity::Base => "base",
            Sensitivity::Accent => "accent",
            Sensitivity::Case => "case",
            Sensitivity::Variant => "variant",
        };
        f.write_str(s)
    }
}

/// Locale and sensitivity for text comparisons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareOptions {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub sensitivity: Sensitivity,
}

fn default_locale() -> String {
    DEFAULT_LOCALE.to_string()
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { locale: default_locale(), sensitivity: DEFAULT_SENSITIVITY }
    }
}

/// A text collator built once and reused across many comparisons
pub struct TextCollator {
    options: CompareOptions,
    collator: Option<CollatorBorrowed<'static>>,
}

impl TextCollator {
    /// Build a collator for the given options.
    ///
    /// An unparsable locale falls back to root collation; if no collator can be
    /// built at all, comparisons fall back to case-folded code-point order.
    pub fn new(options: &CompareOptions) -> Self {
        let collator_options = options.sensitivity.collator_options();

        let prefs = match options.locale.parse::<Locale>() {
            Ok(locale) => CollatorPreferences::from(locale),
            Err(e) => {
                warn!("Invalid collation locale '{}' ({:?}), using root collation", options.locale, e);
                CollatorPreferences::default()
            }
        };

        let collator = match Collator::try_new(prefs, collator_options) {
            Ok(collator) => Some(collator),
            Err(e) => {
                warn!("No collation data for locale '{}' ({}), comparing by code point", options.locale, e);
                None
            }
        };

        Self { options: options.clone(), collator }
    }

    /// Compare two strings under this collator
    pub fn compare_str(&self, a: &str, b: &str) -> Ordering {
        match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        }
    }
}

impl Default for TextCollator {
    fn default() -> Self {
        Self::new(&CompareOptions::default())
    }
}

impl fmt::Debug for TextCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextCollator")
            .field("options", &self.options)
            .field("icu", &self.collator.is_some())
            .finish()
    }
}

/// Compare two field values as trimmed text under the collator's locale.
/// Absent values compare as the empty string.
pub fn compare_text(a: Option<&Value>, b: Option<&Value>, collator: &TextCollator) -> Ordering {
    collator.compare_str(&text_of(a), &text_of(b))
}

/// Compare two field values numerically. Unreadable values count as 0.
pub fn compare_number(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let (a, b) = (number_of(a), number_of(b));
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compare_number_coerces_missing_to_zero() {
        assert_eq!(compare_number(Some(&json!(2)), Some(&json!(10))), Ordering::Less);
        assert_eq!(compare_number(Some(&json!("10")), Some(&json!(2))), Ordering::Greater);
        assert_eq!(compare_number(None, Some(&json!(0))), Ordering::Equal);
        assert_eq!(compare_number(Some(&json!("n/a")), Some(&json!(-1))), Ordering::Greater);
    }

    #[test]
    fn test_compare_text_base_sensitivity_ignores_case_and_accents() {
        let collator = TextCollator::default();
        assert_eq!(compare_text(Some(&json!("desa")), Some(&json!("DESA")), &collator), Ordering::Equal);
        assert_eq!(compare_text(Some(&json!("  Cibodas")), Some(&json!("cibodas ")), &collator), Ordering::Equal);
        assert_eq!(compare_text(Some(&json!("Ándir")), Some(&json!("andir")), &collator), Ordering::Equal);
    }

    #[test]
    fn test_compare_text_is_alphabetic_not_code_point() {
        let collator = TextCollator::default();
        // Code-point order would put every uppercase letter before "a".
        assert_eq!(compare_text(Some(&json!("alpha")), Some(&json!("Beta")), &collator), Ordering::Less);
        assert_eq!(compare_text(None, Some(&json!("a")), &collator), Ordering::Less);
    }

    #[test]
    fn test_variant_sensitivity_distinguishes_case() {
        let options = CompareOptions { locale: "en".to_string(), sensitivity: Sensitivity::Variant };
        let collator = TextCollator::new(&options);
        assert_ne!(collator.compare_str("a", "A"), Ordering::Equal);
    }

    #[test]
    fn test_invalid_locale_still_collates() {
        let options = CompareOptions { locale: "not a locale!".to_string(), sensitivity: Sensitivity::Base };
        let collator = TextCollator::new(&options);
        assert_eq!(collator.compare_str("b", "a"), Ordering::Greater);
    }

    #[test]
    fn test_sensitivity_parsing() {
        assert_eq!("Accent".parse::<Sensitivity>().unwrap(), Sensitivity::Accent);
        assert!("loud".parse::<Sensitivity>().is_err());
    }
}
