//! researchmap achievement categories and their extraction schemas.
//!
//! Each category declares, as static data, which raw field holds the
//! contributor list, which holds the primary date, which classification flags
//! are copied into `info`, and which display fields (in order) go into `body`.

use crate::error::{NenpoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// researchmap endpoint holding the researcher's profile
pub const PROFILE_ENDPOINT: &str = "profile";

/// Achievement endpoints on researchmap that produce bibliography items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    PublishedPapers,
    Awards,
    Misc,
    BooksEtc,
    Presentations,
    Works,
    IndustrialPropertyRights,
    MediaCoverage,
}

impl AchievementCategory {
    /// All categories, in fetch order
    pub const ALL: [AchievementCategory; 8] = [
        AchievementCategory::PublishedPapers,
        AchievementCategory::Awards,
        AchievementCategory::Misc,
        AchievementCategory::BooksEtc,
        AchievementCategory::Presentations,
        AchievementCategory::Works,
        AchievementCategory::IndustrialPropertyRights,
        AchievementCategory::MediaCoverage,
    ];

    /// Endpoint name as used by the researchmap API
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::PublishedPapers => "published_papers",
            AchievementCategory::Awards => "awards",
            AchievementCategory::Misc => "misc",
            AchievementCategory::BooksEtc => "books_etc",
            AchievementCategory::Presentations => "presentations",
            AchievementCategory::Works => "works",
            AchievementCategory::IndustrialPropertyRights => "industrial_property_rights",
            AchievementCategory::MediaCoverage => "media_coverage",
        }
    }

    /// Extraction schema for this category
    pub fn schema(&self) -> &'static CategorySchema {
        match self {
            AchievementCategory::PublishedPapers => &PUBLISHED_PAPERS,
            AchievementCategory::Awards => &AWARDS,
            AchievementCategory::Misc => &MISC,
            AchievementCategory::BooksEtc => &BOOKS_ETC,
            AchievementCategory::Presentations => &PRESENTATIONS,
            AchievementCategory::Works => &WORKS,
            AchievementCategory::IndustrialPropertyRights => &INDUSTRIAL_PROPERTY_RIGHTS,
            AchievementCategory::MediaCoverage => &MEDIA_COVERAGE,
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementCategory {
    type Err = NenpoError;

    fn from_str(s: &str) -> Result<Self> {
        AchievementCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| NenpoError::Parse(format!("unknown achievement category '{}'", s)))
    }
}

/// How a raw field value is turned into a body value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    /// Copied unchanged
    Verbatim,
    /// Language picked out of a multilingual object
    Multilingual,
    /// Multilingual list of `{ "name": ... }` objects, names unwrapped
    NameList,
}

/// Classification flags copied from a raw record into `info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoFlag {
    /// `rm:id`, the researchmap record id
    RmId,
    PublishedPaperType,
    Referee,
    Invited,
    IndustrialPropertyRightType,
}

impl InfoFlag {
    /// Raw field name in researchmap records
    pub fn key(&self) -> &'static str {
        match self {
            InfoFlag::RmId => "rm:id",
            InfoFlag::PublishedPaperType => "published_paper_type",
            InfoFlag::Referee => "referee",
            InfoFlag::Invited => "invited",
            InfoFlag::IndustrialPropertyRightType => "industrial_property_right_type",
        }
    }
}

/// One declared display field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub normalize: Normalize,
}

/// Extraction schema of one achievement category.
#[derive(Debug)]
pub struct CategorySchema {
    /// Raw field holding the contributor list
    pub contributors: &'static str,
    /// Raw field holding the primary date
    pub date: &'static str,
    pub info: &'static [InfoFlag],
    pub body: &'static [FieldSpec],
}

/// Body key used when a record has no contributor list of its own
pub const DEFAULT_CONTRIBUTORS_KEY: &str = "authors";

/// Body keys rendered through the report date formatter
pub const DATE_KEYS: [&str; 4] = ["publication_date", "award_date", "from_date", "registration_date"];

pub const STARTING_PAGE: &str = "starting_page";
pub const ENDING_PAGE: &str = "ending_page";

const fn verbatim(key: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        normalize: Normalize::Verbatim,
    }
}

const fn text(key: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        normalize: Normalize::Multilingual,
    }
}

const fn names(key: &'static str) -> FieldSpec {
    FieldSpec {
        key,
        normalize: Normalize::NameList,
    }
}

const PAPER_FIELDS: &[FieldSpec] = &[
    names("authors"),
    text("paper_title"),
    text("publication_name"),
    verbatim("volume"),
    verbatim("number"),
    verbatim(STARTING_PAGE),
    verbatim(ENDING_PAGE),
    verbatim("publication_date"),
];

static PUBLISHED_PAPERS: CategorySchema = CategorySchema {
    contributors: "authors",
    date: "publication_date",
    info: &[
        InfoFlag::RmId,
        InfoFlag::PublishedPaperType,
        InfoFlag::Referee,
        InfoFlag::Invited,
    ],
    body: PAPER_FIELDS,
};

static AWARDS: CategorySchema = CategorySchema {
    contributors: "winners",
    date: "award_date",
    info: &[InfoFlag::RmId],
    body: &[
        names("winners"),
        text("award_name"),
        text("association"),
        verbatim("award_date"),
    ],
};

static MISC: CategorySchema = CategorySchema {
    contributors: "authors",
    date: "publication_date",
    info: &[InfoFlag::RmId],
    body: PAPER_FIELDS,
};

static BOOKS_ETC: CategorySchema = CategorySchema {
    contributors: "authors",
    date: "publication_date",
    info: &[InfoFlag::RmId],
    body: &[
        names("authors"),
        text("book_title"),
        text("publisher"),
        verbatim("publication_date"),
    ],
};

static PRESENTATIONS: CategorySchema = CategorySchema {
    contributors: "presenters",
    date: "publication_date",
    info: &[InfoFlag::RmId, InfoFlag::Invited],
    body: &[
        names("presenters"),
        text("presentation_title"),
        text("event"),
        text("location"),
        text("address_country"),
        verbatim("publication_date"),
    ],
};

static WORKS: CategorySchema = CategorySchema {
    contributors: "creators",
    date: "from_date",
    info: &[InfoFlag::RmId],
    body: &[
        names("creators"),
        text("work_title"),
        verbatim("url"),
        verbatim("from_date"),
    ],
};

static INDUSTRIAL_PROPERTY_RIGHTS: CategorySchema = CategorySchema {
    contributors: "inventors",
    date: "registration_date",
    info: &[InfoFlag::RmId, InfoFlag::IndustrialPropertyRightType],
    body: &[
        names("inventors"),
        text("industrial_property_right_title"),
        verbatim("application_number"),
        verbatim("patent_number"),
        verbatim("registration_date"),
    ],
};

// media coverage lists no contributors of its own; the researcher is credited
static MEDIA_COVERAGE: CategorySchema = CategorySchema {
    contributors: "authors",
    date: "publication_date",
    info: &[InfoFlag::RmId],
    body: &[
        text("media_coverage_title"),
        text("publisher"),
        text("event"),
        verbatim("publication_date"),
    ],
};
