//! Rendering of classified achievements into `\bibitem` blocks.
//!
//! [`render`] is pure: it returns a [`Bibliography`] document, and the LaTeX
//! text is produced by its `Display` implementation.

use crate::classify::{classify, ReportCategory};
use crate::extract::{AchievementItem, BodyValue};
use crate::normalize::format_date_for_report;
use crate::schema::{DATE_KEYS, ENDING_PAGE, STARTING_PAGE};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;
use tracing::debug;

/// One rendered `\bibitem`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct BibEntry {
    /// Citation key: user id followed by the researchmap record id
    pub label: String,
    /// Comma-joined fields, terminated by a period
    pub text: String,
}

/// All entries of one report category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBlock {
    pub category: ReportCategory,
    pub entries: Vec<BibEntry>,
}

impl CategoryBlock {
    /// Number announced in the block header
    pub fn count(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for CategoryBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CategoryBlock", 4)?;
        state.serialize_field("category", &self.category)?;
        state.serialize_field("label", self.category.label())?;
        state.serialize_field("count", &self.count())?;
        state.serialize_field("entries", &self.entries)?;
        state.end()
    }
}

/// Rendered bibliography: non-empty categories in report order.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Bibliography {
    pub blocks: Vec<CategoryBlock>,
}

impl Bibliography {
    /// Total number of entries across all blocks
    pub fn entry_count(&self) -> usize {
        self.blocks.iter().map(CategoryBlock::count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn block(&self, category: ReportCategory) -> Option<&CategoryBlock> {
        self.blocks.iter().find(|b| b.category == category)
    }
}

impl fmt::Display for Bibliography {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for block in &self.blocks {
            let label = block.category.label();
            writeln!(f, "\\begin{{{}}}{{{}}}", label, block.count())?;
            for entry in &block.entries {
                writeln!(f, "\\bibitem{{{}}}", entry.label)?;
                write!(f, "{}\n\n", entry.text)?;
            }
            write!(f, "\\end{{{}}}\n\n", label)?;
        }
        Ok(())
    }
}

/// Group, count and render achievements.
///
/// Items keep their collection order inside each block; items without a
/// report category are left out.
pub fn render(items: &[AchievementItem]) -> Bibliography {
    let classified: Vec<(Option<ReportCategory>, &AchievementItem)> =
        items.iter().map(|item| (classify(&item.info), item)).collect();

    for (_, item) in classified.iter().filter(|(category, _)| category.is_none()) {
        debug!(
            user_id = %item.info.user_id,
            rm_id = ?item.info.rm_id,
            seika_type = %item.info.seika_type,
            "Achievement has no report category, skipping"
        );
    }

    let blocks = ReportCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let entries: Vec<BibEntry> = classified
                .iter()
                .filter(|(c, _)| *c == Some(category))
                .map(|(_, item)| render_entry(item))
                .collect();
            (!entries.is_empty()).then_some(CategoryBlock { category, entries })
        })
        .collect();

    Bibliography { blocks }
}

/// Render a single achievement as a bibliography entry.
pub fn render_entry(item: &AchievementItem) -> BibEntry {
    let label = format!(
        "{}{}",
        item.info.user_id,
        item.info.rm_id.as_deref().unwrap_or_default()
    );
    let mut text = entry_tokens(item).join(", ");
    text.push('.');
    BibEntry { label, text }
}

fn entry_tokens(item: &AchievementItem) -> Vec<String> {
    let mut tokens = Vec::with_capacity(item.body.len());
    for field in &item.body {
        match (&field.value, field.key) {
            (BodyValue::Names(names), _) => tokens.push(names.join(", ")),
            (value, key) if DATE_KEYS.contains(&key) => {
                tokens.push(format_date_for_report(&value.as_text(), item.info.lang))
            }
            (_, STARTING_PAGE) => {}
            (value, ENDING_PAGE) => {
                if let Some(start) = item.body_value(STARTING_PAGE) {
                    tokens.push(format!("pp{}-{}", start.as_text(), value.as_text()));
                }
            }
            (value, _) => tokens.push(value.as_text()),
        }
    }
    tokens
}
