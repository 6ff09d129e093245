//! # Spreadsheet Grid Module
//!
//! This module holds the leaderboard search core: a read-only [`Grid`] of
//! cell values fetched from a sheet, the locator that finds a subcategory
//! label inside it, and the extractor that rebuilds the table of contestants
//! found under that label.
//!
//! Everything here is pure. Nothing performs I/O, and neither the locator
//! nor the extractor fails: a missing label is `None`, and an unexpected
//! layout shows up as an empty header run or sparse records.
pub mod cell;
pub mod grid;
pub mod range;
pub mod reference;
pub mod table;

pub use cell::CellValue;
pub use cell::Matcher;
pub use grid::locate;
pub use grid::CellPosition;
pub use grid::Grid;
pub use range::Range;
pub use table::extract_headers;
pub use table::extract_rows;
pub use table::HeaderRun;
pub use table::Record;
pub use table::ResultTable;
pub use table::RowLimit;
pub use table::RowLimitMode;
