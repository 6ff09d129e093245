//! # Speedrun Leaderboard Lookup
//!
//! Looks up speedrun leaderboard entries kept in a shared Google spreadsheet.
//! A request names a category (a sheet, usually through a short alias), a
//! subcategory (a label somewhere inside that sheet) and a row bound; the
//! reply is the table of contestants found under the label.
//!
//! ## Features
//!
//! - **Grid search**: first-match lookup of a label in row-major order, with
//!   loose (coercing) or exact matching
//! - **Table extraction**: header run read from the row below the label, data
//!   rows read underneath it, absent cells passed through
//! - **Column references**: bijective base-26 column letters and A1 windows
//! - **Category aliases**: a swappable alias table with a title-casing fallback
//! - **Sheets client**: blocking values API client with OAuth token refresh
//!
//! ## Layout
//!
//! - [`spreadsheet`]: the pure grid/locator/extractor core
//! - [`sheets`]: the data source collaborator
//! - [`category`]: alias resolution and label normalization
//! - [`lookup`]: one request end to end
//! - [`sink`]: reply delivery
pub mod category;
pub mod config;
pub mod error;
pub mod lookup;
pub mod sheets;
pub mod sink;
pub mod spreadsheet;

pub use config::Config;
pub use error::SpeedrunError;
pub use lookup::Lookup;
pub use lookup::LookupOutcome;
pub use lookup::Speedrun;
