//! Mapping of achievements onto the annual-report categories.

use crate::extract::AchievementInfo;
use crate::schema::AchievementCategory;
use serde::Serialize;
use std::fmt;

/// Report categories, declared in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    /// 著書／編集
    Book,
    /// その他の発表論文
    OtherPresentation,
    /// 雑誌以外の査読付論文
    PeerReviewed,
    /// 雑誌論文
    JournalPaper,
    /// 招待講演
    InvitedTalk,
    /// 招待論文
    InvitedPaper,
    /// 特許申請／取得
    Patent,
    /// 特記事項
    SpecialNote,
    /// 公開ソフトウェア
    PublicSoftware,
    /// 報道関連
    MediaCoverage,
    /// 受賞関連
    Award,
}

impl ReportCategory {
    /// All categories in output order
    pub const ALL: [ReportCategory; 11] = [
        ReportCategory::Book,
        ReportCategory::OtherPresentation,
        ReportCategory::PeerReviewed,
        ReportCategory::JournalPaper,
        ReportCategory::InvitedTalk,
        ReportCategory::InvitedPaper,
        ReportCategory::Patent,
        ReportCategory::SpecialNote,
        ReportCategory::PublicSoftware,
        ReportCategory::MediaCoverage,
        ReportCategory::Award,
    ];

    /// Environment name defined by the annual-report style file
    pub fn label(&self) -> &'static str {
        match self {
            ReportCategory::Book => "著書",
            ReportCategory::OtherPresentation => "発表",
            ReportCategory::PeerReviewed => "査読付",
            ReportCategory::JournalPaper => "雑誌論文",
            ReportCategory::InvitedTalk => "招待講演",
            ReportCategory::InvitedPaper => "招待論文",
            ReportCategory::Patent => "特許",
            ReportCategory::SpecialNote => "特記",
            ReportCategory::PublicSoftware => "公開",
            ReportCategory::MediaCoverage => "報道",
            ReportCategory::Award => "受賞",
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// researchmap paper type that counts as a journal paper
const SCIENTIFIC_JOURNAL: &str = "scientific_journal";

/// Industrial property right type reported as a patent
const PATENT_RIGHT: &str = "patent_right";

/// Decide which report category an achievement belongs to.
///
/// Returns `None` for industrial property rights other than patents; those
/// items are left out of the report.
pub fn classify(info: &AchievementInfo) -> Option<ReportCategory> {
    let invited = info.invited.unwrap_or(false);
    match info.seika_type {
        AchievementCategory::PublishedPapers => {
            let category = if invited {
                ReportCategory::InvitedPaper
            } else if !info.referee.unwrap_or(false) {
                ReportCategory::OtherPresentation
            } else if info.published_paper_type.as_deref() == Some(SCIENTIFIC_JOURNAL) {
                ReportCategory::JournalPaper
            } else {
                ReportCategory::PeerReviewed
            };
            Some(category)
        }
        AchievementCategory::Awards => Some(ReportCategory::Award),
        AchievementCategory::Misc => Some(ReportCategory::OtherPresentation),
        AchievementCategory::BooksEtc => Some(ReportCategory::Book),
        AchievementCategory::Presentations if invited => Some(ReportCategory::InvitedTalk),
        AchievementCategory::Presentations => Some(ReportCategory::SpecialNote),
        AchievementCategory::Works => Some(ReportCategory::PublicSoftware),
        AchievementCategory::IndustrialPropertyRights => {
            (info.industrial_property_right_type.as_deref() == Some(PATENT_RIGHT))
                .then_some(ReportCategory::Patent)
        }
        AchievementCategory::MediaCoverage => Some(ReportCategory::MediaCoverage),
    }
}
