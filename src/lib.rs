//! # nenpo-seika
//!
//! Turns researchmap achievement records into the categorized `\bibitem`
//! listing of an annual report.
//!
//! ## Modules
//!
//! - [`normalize`] - multilingual values, person names, report dates
//! - [`schema`] - achievement categories and their extraction schemas
//! - [`extract`] - raw records to [`extract::AchievementItem`]
//! - [`date_filter`] - partial dates and report periods
//! - [`classify`] - report categories
//! - [`bibliography`] - grouping, counting and rendering
//! - [`source`] - researchmap API client and in-memory records
//! - [`batch`] - batch input rows
//! - [`pipeline`] - the end-to-end run
//! - [`server`] - HTTP service
//! - [`error`] - Custom error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nenpo_seika::{batch, config::SourceConfig, pipeline, source::ResearchmapClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let requests = batch::read_batch("tkuga, en, 2021/4/1, 2022/3/31".as_bytes())?;
//!     let client = ResearchmapClient::new(&SourceConfig::default())?;
//!     let bibliography = pipeline::build_bibliography(&client, &requests).await?;
//!     print!("{}", bibliography);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod bibliography;
pub mod classify;
pub mod config;
pub mod date_filter;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod server;
pub mod source;

pub use error::{NenpoError, Result};
