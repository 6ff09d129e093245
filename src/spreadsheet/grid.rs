use crate::spreadsheet::cell::CellValue;
use crate::spreadsheet::cell::Matcher;
use crate::spreadsheet::reference::column_to_name;
use crate::spreadsheet::reference::index_to_reference;

/// An immutable snapshot of a fetched sheet range, stored row by row.
///
/// Rows may be ragged: trailing blank cells are usually omitted by the values
/// endpoint, so any cell past the end of its row is absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Builds a grid of text cells, mapping `""` to empty text.
    pub fn from_text<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: AsRef<str>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(|text| CellValue::from(text.as_ref())).collect())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows in the snapshot.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Returns the cell at (row, col), or None if it lies outside the populated extent.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }
}

/// Location of a cell found in a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellPosition {
    /// Row index (0-based)
    pub row: usize,
    /// Column index (0-based)
    pub column: usize,
    /// Column letters for `column + 1` (e.g. 0 => "A")
    pub column_label: String,
}

impl CellPosition {
    pub fn new(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            column_label: column_to_name(column + 1),
        }
    }

    /// Returns the A1-style reference (e.g. "B3").
    pub fn reference(&self) -> String {
        index_to_reference(self.row, self.column)
    }
}

/// Finds the first cell, in row-major order, that matches `target`.
///
/// Returns None when no cell matches; deciding whether that is an error is up
/// to the caller.
pub fn locate(target: &str, grid: &Grid, matcher: Matcher) -> Option<CellPosition> {
    grid.rows().iter().enumerate().find_map(|(row, cells)| {
        cells
            .iter()
            .position(|cell| matcher.matches(target, cell))
            .map(|column| CellPosition::new(row, column))
    })
}
