//! Value normalization for researchmap records.
//!
//! researchmap delivers most text as `{ "en": ..., "ja": ... }` objects and
//! person names as `"Family, Given"`. These helpers turn both into the plain
//! strings the bibliography needs, and render partial dates for the report.

use crate::date_filter::{PartialDate, Precision};
use crate::error::{NenpoError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Output language of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// Primary report language
    #[default]
    En,
    /// Secondary report language
    Ja,
}

impl Lang {
    /// Key used for this language inside multilingual objects
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Ja => "ja",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Lang {
    type Err = NenpoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "en" => Ok(Lang::En),
            "ja" => Ok(Lang::Ja),
            other => Err(NenpoError::Config(format!(
                "unsupported language '{}' (expected 'en' or 'ja')",
                other
            ))),
        }
    }
}

/// Pick the requested language out of a multilingual object.
///
/// Falls back to the entry with the smallest language key when the requested
/// one is missing, so the choice does not depend on map iteration order.
///
/// # Errors
///
/// [`NenpoError::EmptyValue`] when the value is not an object or has no entries.
pub fn unwrap_multilingual(value: &Value, lang: Lang) -> Result<&Value> {
    let map = value.as_object().ok_or(NenpoError::EmptyValue)?;
    if let Some(v) = map.get(lang.as_str()) {
        return Ok(v);
    }
    map.iter()
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, v)| v)
        .ok_or(NenpoError::EmptyValue)
}

/// Turn `"Family, Given"` into `"Given Family"`; other names pass through.
pub fn unwrap_name(name: &str) -> String {
    match name.split_once(", ") {
        Some((family, given)) => format!("{} {}", given, family),
        None => name.to_string(),
    }
}

const JA_DATE_UNITS: [&str; 3] = ["年", "月", "日"];

/// Render a partial date (`YYYY`, `YYYY-MM`, `YYYY-MM-DD`) for the report.
///
/// Japanese output keeps the digits as written (`2021-4` → `2021年4月`).
/// Returns an empty string for anything that is not a valid partial date.
pub fn format_date_for_report(date: &str, lang: Lang) -> String {
    let Some(parsed) = PartialDate::parse(date) else {
        return String::new();
    };
    let d = parsed.date();
    match (lang, parsed.precision()) {
        (Lang::En, Precision::Day) => d.format("%-d %b, %Y").to_string(),
        (Lang::En, Precision::Month) => d.format("%b, %Y").to_string(),
        (Lang::En, Precision::Year) => d.format("%Y").to_string(),
        (Lang::Ja, _) => date
            .trim()
            .split('-')
            .zip(JA_DATE_UNITS)
            .map(|(digits, unit)| format!("{}{}", digits, unit))
            .collect(),
    }
}
