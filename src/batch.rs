//! Batch input: which researchers to report on.
//!
//! CSV rows (no header) take one of three shapes:
//! `user_id`, `user_id, lang` or `user_id, lang, date_from, date_to`,
//! with dates written as `2021/4/1`.

use crate::date_filter::DateRange;
use crate::error::{NenpoError, Result};
use crate::normalize::Lang;
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Date format of the batch input
pub const BATCH_DATE_FORMAT: &str = "%Y/%m/%d";

const ROW_FORMAT_HELP: &str =
    "expected <rmap_id>[, <lang: en>][, <date_from: \"2021/4/1\">, <date_to: \"2022/3/1\">]";

/// One researcher to fetch, with output language and optional report period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRequest {
    pub user_id: String,
    pub lang: Lang,
    pub range: Option<DateRange>,
}

/// Loosely typed batch row as received over JSON.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchRow {
    pub user_id: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
}

impl TryFrom<BatchRow> for UserRequest {
    type Error = NenpoError;

    fn try_from(row: BatchRow) -> Result<Self> {
        let user_id = row.user_id.trim();
        if user_id.is_empty() {
            return Err(NenpoError::Config("empty user id".to_string()));
        }
        let lang = match row.lang.as_deref() {
            Some(lang) if !lang.trim().is_empty() => lang.parse()?,
            _ => Lang::default(),
        };
        let range = match (row.date_from.as_deref(), row.date_to.as_deref()) {
            (None, None) => None,
            (Some(from), Some(to)) => Some(DateRange::new(parse_batch_date(from)?, parse_batch_date(to)?)),
            _ => {
                return Err(NenpoError::Config(format!(
                    "user '{}': date_from and date_to must be given together",
                    user_id
                )))
            }
        };
        Ok(UserRequest {
            user_id: user_id.to_string(),
            lang,
            range,
        })
    }
}

fn parse_batch_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), BATCH_DATE_FORMAT)
        .map_err(|e| NenpoError::Config(format!("invalid date '{}' ({}): {}", s, BATCH_DATE_FORMAT, e)))
}

/// Interpret the fields of one CSV row.
pub fn parse_row(fields: &[&str]) -> Result<UserRequest> {
    let field = |i: usize| Some(fields[i].to_string());
    let row = match fields.len() {
        1 => BatchRow {
            user_id: fields[0].to_string(),
            ..Default::default()
        },
        2 => BatchRow {
            user_id: fields[0].to_string(),
            lang: field(1),
            ..Default::default()
        },
        4 => BatchRow {
            user_id: fields[0].to_string(),
            lang: field(1),
            date_from: field(2),
            date_to: field(3),
        },
        n => {
            return Err(NenpoError::Config(format!(
                "row has {} fields, {}",
                n, ROW_FORMAT_HELP
            )))
        }
    };
    UserRequest::try_from(row)
}

/// Read every batch row; any malformed row fails the whole batch.
pub fn read_batch<R: Read>(reader: R) -> Result<Vec<UserRequest>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut requests = Vec::new();
    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());
        // a quote after leading whitespace is not treated as quoting by the reader
        let fields: Vec<&str> = record.iter().map(|f| f.trim_matches('"').trim()).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        let request = parse_row(&fields)
            .map_err(|e| NenpoError::Config(format!("line {}: {}", line, e)))?;
        requests.push(request);
    }
    Ok(requests)
}

/// Read batch rows from a CSV file.
pub fn read_batch_file(path: &Path) -> Result<Vec<UserRequest>> {
    let file = std::fs::File::open(path)?;
    let requests = read_batch(file)?;
    info!(path = %path.display(), users = requests.len(), "Loaded batch input");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn test_row_shapes() -> Result<()> {
        let only_id = parse_row(&["tkuga"])?;
        assert_eq!(only_id.lang, Lang::En);
        assert_eq!(only_id.range, None);

        let with_lang = parse_row(&["tkuga", "ja"])?;
        assert_eq!(with_lang.lang, Lang::Ja);

        let full = parse_row(&["tkuga", "en", "2021/4/1", "2022/3/31"])?;
        assert_eq!(full.range, Some(DateRange::new(ymd(2021, 4, 1), ymd(2022, 3, 31))));
        Ok(())
    }

    #[test]
    fn test_bad_rows() {
        assert!(matches!(parse_row(&["a", "en", "2021/4/1"]), Err(NenpoError::Config(_))));
        assert!(matches!(parse_row(&["a", "fr"]), Err(NenpoError::Config(_))));
        assert!(matches!(parse_row(&["a", "en", "2021-04-01", "2022/3/31"]), Err(NenpoError::Config(_))));
        assert!(matches!(parse_row(&[""]), Err(NenpoError::Config(_))));
    }

    #[test]
    fn test_json_row_requires_both_dates() {
        let row = BatchRow {
            user_id: "a".to_string(),
            date_from: Some("2021/4/1".to_string()),
            ..Default::default()
        };
        assert!(UserRequest::try_from(row).is_err());
    }

    #[test]
    fn test_read_batch_file() -> Result<()> {
        let mut temp = NamedTempFile::new()?;
        writeln!(temp, "tkuga")?;
        writeln!(temp, "hanako, ja")?;
        writeln!(temp)?;
        writeln!(temp, "jiro, en, \"2021/4/1\", \"2022/3/1\"")?;

        let requests = read_batch_file(temp.path())?;
        let ids: Vec<&str> = requests.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, ["tkuga", "hanako", "jiro"]);
        assert_eq!(requests[2].range, Some(DateRange::new(ymd(2021, 4, 1), ymd(2022, 3, 1))));
        Ok(())
    }

    #[test]
    fn test_read_batch_reports_line() {
        let err = read_batch("ok\nbad, en, 2021/4/1\n".as_bytes()).expect_err("three fields");
        assert!(err.to_string().contains("line 2"));
    }
}
