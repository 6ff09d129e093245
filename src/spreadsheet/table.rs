use crate::error::SpeedrunError;
use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::grid::CellPosition;
use crate::spreadsheet::grid::Grid;

/// Column labels read rightward from the row below a located subcategory.
pub type HeaderRun = Vec<CellValue>;

/// One contestant row. `None` marks a cell outside the grid's populated extent.
pub type Record = Vec<Option<CellValue>>;

/// Records read below a header run, aligned with it by position.
pub type ResultTable = Vec<Record>;

/// Upper bound for the data rows read under a header run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowLimit {
    /// Read data rows up to and including this absolute row index.
    /// Tables further down the sheet yield fewer rows for the same bound.
    AbsoluteIndex(usize),
    /// Read this many data rows after the header row.
    Count(usize),
}

impl RowLimit {
    /// Builds a limit of the given mode from a raw request value.
    pub fn new(mode: RowLimitMode, value: usize) -> Self {
        match mode {
            RowLimitMode::Absolute => RowLimit::AbsoluteIndex(value),
            RowLimitMode::Count => RowLimit::Count(value),
        }
    }

    /// Row indices to read when data starts at `first`.
    fn rows(&self, first: usize) -> std::ops::Range<usize> {
        match *self {
            RowLimit::AbsoluteIndex(last) => first..last.saturating_add(1).max(first),
            RowLimit::Count(count) => first..first.saturating_add(count),
        }
    }
}

impl TryFrom<i64> for RowLimit {
    type Error = SpeedrunError;

    /// Validates a signed row count, read as an absolute index.
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .map(RowLimit::AbsoluteIndex)
            .map_err(|_| SpeedrunError::InvalidRowCount(value))
    }
}

/// Which `RowLimit` a raw row count becomes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RowLimitMode {
    #[default]
    Absolute,
    Count,
}

impl RowLimitMode {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "absolute" | "index" => Some(Self::Absolute),
            "count" | "relative" => Some(Self::Count),
            _ => None,
        }
    }
}

/// Reads the header run one row below `position`, starting at its column.
/// Stops before the first absent, blank or empty-text cell.
pub fn extract_headers(grid: &Grid, position: &CellPosition) -> HeaderRun {
    let header_row = position.row + 1;
    (position.column..)
        .map_while(|col| grid.get(header_row, col).filter(|cell| !cell.is_blank()))
        .cloned()
        .collect()
}

/// Reads the data rows below the header run, restricted to its columns.
///
/// No bounds checking is done: cells outside the grid come back as None, so
/// records can be sparse.
pub fn extract_rows(grid: &Grid, position: &CellPosition, headers: &HeaderRun, limit: RowLimit) -> ResultTable {
    let columns = position.column..position.column + headers.len();
    limit
        .rows(position.row + 2)
        .map(|row| columns.clone().map(|col| grid.get(row, col).cloned()).collect())
        .collect()
}
