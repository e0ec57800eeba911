//! Fetch → extract → filter → render, one researcher at a time.

use crate::batch::{BatchRow, UserRequest};
use crate::bibliography::{render, Bibliography};
use crate::date_filter::passes;
use crate::error::Result;
use crate::extract::{extract_items, researcher_name, AchievementItem, UserContext};
use crate::schema::{AchievementCategory, PROFILE_ENDPOINT};
use crate::source::{RecordSource, StaticSource};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};

/// Fetch and extract all achievements of one researcher.
///
/// The profile and the eight categories are fetched strictly in sequence.
/// Items outside the requested period are dropped.
pub async fn collect_user<S: RecordSource>(source: &S, request: &UserRequest) -> Result<Vec<AchievementItem>> {
    let user_id = request.user_id.as_str();
    let profile = source.fetch(user_id, PROFILE_ENDPOINT).await?;
    let researcher_name = researcher_name(&profile).unwrap_or_else(|| {
        warn!(user_id, "Profile has no name, using the user id");
        user_id.to_string()
    });
    let ctx = UserContext {
        user_id: user_id.to_string(),
        researcher_name,
        lang: request.lang,
    };

    let mut items = Vec::new();
    for category in AchievementCategory::ALL {
        let response = source.fetch(user_id, category.as_str()).await?;
        let extracted = extract_items(&response, category, &ctx)?;
        let total = extracted.len();
        let before = items.len();
        items.extend(
            extracted
                .into_iter()
                .filter(|item| passes(&item.info.date, request.range.as_ref())),
        );
        info!(
            user_id,
            category = %category,
            total,
            kept = items.len() - before,
            "Extracted achievements"
        );
    }
    Ok(items)
}

/// Collect achievements of every requested researcher, in request order.
///
/// The first failing fetch aborts the whole batch.
pub async fn collect<S: RecordSource>(source: &S, requests: &[UserRequest]) -> Result<Vec<AchievementItem>> {
    let mut items = Vec::new();
    for request in requests {
        items.extend(collect_user(source, request).await?);
    }
    info!(users = requests.len(), items = items.len(), "Collected achievements");
    Ok(items)
}

/// Run the whole batch and render the bibliography.
pub async fn build_bibliography<S: RecordSource>(source: &S, requests: &[UserRequest]) -> Result<Bibliography> {
    let items = collect(source, requests).await?;
    let bibliography = render(&items);
    info!(
        blocks = bibliography.blocks.len(),
        entries = bibliography.entry_count(),
        "Rendered bibliography"
    );
    Ok(bibliography)
}

/// One researcher in an offline JSON dump.
#[derive(Debug, Deserialize)]
pub struct UserDump {
    #[serde(flatten)]
    pub row: BatchRow,
    /// Endpoint name → raw API response
    #[serde(default)]
    pub records: HashMap<String, Value>,
}

/// Turn a JSON dump (array of [`UserDump`]) into a record source plus requests.
pub fn load_dump(json: &str) -> Result<(StaticSource, Vec<UserRequest>)> {
    let dumps: Vec<UserDump> = serde_json::from_str(json)?;
    let mut source = StaticSource::new();
    let mut requests = Vec::with_capacity(dumps.len());
    for dump in dumps {
        let request = UserRequest::try_from(dump.row)?;
        source.insert_user(request.user_id.clone(), dump.records);
        requests.push(request);
    }
    Ok((source, requests))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date_filter::DateRange;
    use crate::error::NenpoError;
    use crate::normalize::Lang;
    use chrono::NaiveDate;
    use serde_json::json;

    fn request(user_id: &str) -> UserRequest {
        UserRequest {
            user_id: user_id.to_string(),
            lang: Lang::En,
            range: None,
        }
    }

    fn profile() -> Value {
        json!({"given_name": {"en": "Hanako"}, "family_name": {"en": "Sato"}})
    }

    #[tokio::test]
    async fn test_collect_user_applies_range() -> Result<()> {
        let mut source = StaticSource::new();
        source.insert("hsato", "profile", profile());
        source.insert(
            "hsato",
            "awards",
            json!({"items": [
                {"rm:id": "1", "award_date": "2021-06-01"},
                {"rm:id": "2", "award_date": "2019-06-01"},
                {"rm:id": "3"},
            ]}),
        );

        let all = collect_user(&source, &request("hsato")).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].info.researcher_name, "Hanako Sato");

        let ranged = UserRequest {
            range: Some(DateRange::new(
                NaiveDate::from_ymd_opt(2021, 4, 1).expect("date"),
                NaiveDate::from_ymd_opt(2022, 3, 31).expect("date"),
            )),
            ..request("hsato")
        };
        let kept = collect_user(&source, &ranged).await?;
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].info.rm_id.as_deref(), Some("1"));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_profile_name_falls_back_to_user_id() -> Result<()> {
        let mut source = StaticSource::new();
        source.insert("anon", "works", json!({"items": [{"work_title": {"en": "Tool"}}]}));
        let items = collect_user(&source, &request("anon")).await?;
        assert_eq!(items[0].info.researcher_name, "anon");
        Ok(())
    }

    #[tokio::test]
    async fn test_failing_fetch_aborts_batch() {
        let mut source = StaticSource::new();
        source.insert("hsato", "profile", profile());
        let result = collect(&source, &[request("hsato"), request("missing")]).await;
        assert!(matches!(result, Err(NenpoError::Api { code: 404, .. })));
    }

    #[test]
    fn test_load_dump() -> Result<()> {
        let dump = r#"[
            {"user_id": "hsato", "lang": "ja", "records": {"profile": {}}},
            {"user_id": "tkuga", "date_from": "2021/4/1", "date_to": "2022/3/31"}
        ]"#;
        let (_source, requests) = load_dump(dump)?;
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].lang, Lang::Ja);
        assert!(requests[1].range.is_some());
        Ok(())
    }
}
