//! Extraction of raw researchmap records into uniform achievement items.

use crate::error::{NenpoError, OptionExt, Result};
use crate::normalize::{unwrap_multilingual, unwrap_name, Lang};
use crate::schema::{AchievementCategory, FieldSpec, InfoFlag, Normalize, DEFAULT_CONTRIBUTORS_KEY};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Classification-relevant part of an achievement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementInfo {
    pub seika_type: AchievementCategory,
    pub user_id: String,
    pub researcher_name: String,
    /// Primary date exactly as delivered (empty when missing)
    pub date: String,
    /// Output language requested for this researcher
    pub lang: Lang,
    #[serde(rename = "rm:id", skip_serializing_if = "Option::is_none")]
    pub rm_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_paper_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referee: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invited: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industrial_property_right_type: Option<String>,
}

/// Normalized display value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BodyValue {
    Text(String),
    Names(Vec<String>),
    /// Non-string scalar copied unchanged
    Raw(Value),
}

impl BodyValue {
    /// Plain-text rendering of the value
    pub fn as_text(&self) -> String {
        match self {
            BodyValue::Text(s) => s.clone(),
            BodyValue::Names(names) => names.join(", "),
            BodyValue::Raw(Value::String(s)) => s.clone(),
            BodyValue::Raw(v) => v.to_string(),
        }
    }
}

/// One display field of an achievement, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyField {
    pub key: &'static str,
    pub value: BodyValue,
}

/// A single achievement normalized for classification and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementItem {
    pub info: AchievementInfo,
    pub body: Vec<BodyField>,
}

impl AchievementItem {
    /// Look up a body field by key
    pub fn body_value(&self, key: &str) -> Option<&BodyValue> {
        self.body.iter().find(|f| f.key == key).map(|f| &f.value)
    }
}

/// Who the records belong to and how they should be rendered.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user_id: String,
    pub researcher_name: String,
    pub lang: Lang,
}

/// Build the researcher's display name (`given family`) from a profile response.
pub fn researcher_name(profile: &Value) -> Option<String> {
    let part = |key: &str| -> Option<String> {
        let value = unwrap_multilingual(profile.get(key)?, Lang::En).ok()?;
        value.as_str().map(|s| s.trim().to_string())
    };
    match (part("given_name"), part("family_name")) {
        (Some(given), Some(family)) => Some(format!("{} {}", given, family).trim().to_string()),
        (Some(name), None) | (None, Some(name)) => Some(name),
        (None, None) => None,
    }
}

/// Extract every record of one category response (`{ "items": [...] }`).
pub fn extract_items(
    response: &Value,
    category: AchievementCategory,
    ctx: &UserContext,
) -> Result<Vec<AchievementItem>> {
    let Some(items) = response.get("items") else {
        debug!(user_id = %ctx.user_id, category = %category, "Response has no items");
        return Ok(Vec::new());
    };
    items
        .as_array()
        .ok_or_parse("'items' is not an array")?
        .iter()
        .map(|raw| extract_item(raw, category, ctx))
        .collect()
}

/// Extract a single raw record according to its category schema.
pub fn extract_item(
    raw: &Value,
    category: AchievementCategory,
    ctx: &UserContext,
) -> Result<AchievementItem> {
    let record = raw.as_object().ok_or_parse("achievement record is not an object")?;
    let schema = category.schema();

    let mut info = AchievementInfo {
        seika_type: category,
        user_id: ctx.user_id.clone(),
        researcher_name: ctx.researcher_name.clone(),
        date: record.get(schema.date).and_then(scalar_text).unwrap_or_default(),
        lang: ctx.lang,
        rm_id: None,
        published_paper_type: None,
        referee: None,
        invited: None,
        industrial_property_right_type: None,
    };
    for flag in schema.info {
        let Some(value) = record.get(flag.key()) else {
            continue;
        };
        match flag {
            InfoFlag::RmId => info.rm_id = scalar_text(value),
            InfoFlag::PublishedPaperType => info.published_paper_type = scalar_text(value),
            InfoFlag::Referee => info.referee = value.as_bool(),
            InfoFlag::Invited => info.invited = value.as_bool(),
            InfoFlag::IndustrialPropertyRightType => {
                info.industrial_property_right_type = scalar_text(value)
            }
        }
    }

    let mut body: Vec<BodyField> = schema
        .body
        .iter()
        .filter_map(|spec| extract_field(record, spec, ctx))
        .collect();

    if !body.iter().any(|f| matches!(f.value, BodyValue::Names(_))) {
        body.insert(
            0,
            BodyField {
                key: DEFAULT_CONTRIBUTORS_KEY,
                value: BodyValue::Names(vec![ctx.researcher_name.clone()]),
            },
        );
    }

    Ok(AchievementItem { info, body })
}

fn extract_field(record: &Map<String, Value>, spec: &FieldSpec, ctx: &UserContext) -> Option<BodyField> {
    let raw = record.get(spec.key)?;
    match normalize_value(raw, spec.normalize, ctx.lang) {
        Ok(value) => Some(BodyField {
            key: spec.key,
            value,
        }),
        Err(e) => {
            debug!(user_id = %ctx.user_id, field = spec.key, error = %e, "Dropping empty field");
            None
        }
    }
}

fn normalize_value(raw: &Value, normalize: Normalize, lang: Lang) -> Result<BodyValue> {
    match normalize {
        Normalize::Verbatim => match raw {
            Value::Null => Err(NenpoError::EmptyValue),
            Value::String(s) => Ok(BodyValue::Text(s.clone())),
            other => Ok(BodyValue::Raw(other.clone())),
        },
        Normalize::Multilingual => match unwrap_multilingual(raw, lang)? {
            Value::Null => Err(NenpoError::EmptyValue),
            Value::String(s) => Ok(BodyValue::Text(s.clone())),
            other => Ok(BodyValue::Raw(other.clone())),
        },
        Normalize::NameList => {
            let people = unwrap_multilingual(raw, lang)?
                .as_array()
                .ok_or(NenpoError::EmptyValue)?;
            let names: Vec<String> = people
                .iter()
                .filter_map(|p| p.get("name").and_then(Value::as_str))
                .map(unwrap_name)
                .collect();
            if names.len() < people.len() {
                warn!(expected = people.len(), found = names.len(), "Contributor entries without a name");
            }
            if names.is_empty() {
                return Err(NenpoError::EmptyValue);
            }
            Ok(BodyValue::Names(names))
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
