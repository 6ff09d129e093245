use crate::error::SpeedrunError;
use crate::spreadsheet::reference::col_to_index;
use crate::spreadsheet::reference::column_to_name;
use crate::spreadsheet::reference::row_to_index;
use regex::Regex;
use std::fmt::Display;
use thiserror::Error;

/// Errors related to A1-style range parsing.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Invalid range format '{0}'")]
    FormatError(String),
}

/// An A1-style cell window with optional boundaries, used to narrow the
/// fetched part of a sheet.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Range {
    /// Lower row bound (0-based index), None for unbounded
    pub row_lower_bound: Option<usize>,
    /// Upper row bound (0-based index), None for unbounded
    pub row_upper_bound: Option<usize>,
    /// Lower column bound (0-based index), None for unbounded
    pub col_lower_bound: Option<usize>,
    /// Upper column bound (0-based index), None for unbounded
    pub col_upper_bound: Option<usize>,
}

impl Range {
    /// Returns the window in A1 notation (e.g. "A1:Z200"), or an empty string
    /// for an unbounded window.
    pub fn to_a1(&self) -> String {
        let lower = bound_to_a1(self.col_lower_bound, self.row_lower_bound);
        let upper = bound_to_a1(self.col_upper_bound, self.row_upper_bound);
        if upper.is_empty() {
            lower
        } else {
            format!("{lower}:{upper}")
        }
    }

    /// Returns true if no bound is set.
    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }

    /// Builds the request range for a sheet: the quoted sheet name, followed by
    /// the window when one is set (e.g. `'GL 4* Overall rankings'!A1:Z200`).
    pub fn qualify(&self, sheet: &str) -> String {
        let sheet = format!("'{}'", sheet.replace('\'', "''"));
        if self.is_unbounded() {
            sheet
        } else {
            format!("{sheet}!{}", self.to_a1())
        }
    }
}

fn bound_to_a1(col: Option<usize>, row: Option<usize>) -> String {
    let col = col.map(|col| column_to_name(col + 1)).unwrap_or_default();
    let row = row.map(|row| (row + 1).to_string()).unwrap_or_default();
    format!("{col}{row}")
}

impl TryFrom<&str> for Range {
    type Error = SpeedrunError;

    /// Parses an A1-style range string (e.g., "A1", "B2:C5", "A", "1:10").
    /// Supports single cells, ranges, and partial ranges (columns or rows only).
    /// A range needs a lower bound, and every bound given must be a valid
    /// column or row.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let pattern = Regex::new(r"^([A-Z]*)(\d*)(:([A-Z]*)(\d*))?$").expect("Hardcode regex pattern");
        let value = value.trim().to_ascii_uppercase();
        let format_error = || RangeError::FormatError(value.to_owned());
        let captures = pattern.captures(value.as_str()).ok_or_else(format_error)?;
        let bound = |index: usize, parse: fn(&str) -> Option<usize>| {
            match captures.get(index).map(|matcher| matcher.as_str()) {
                None | Some("") => Ok(None),
                Some(text) => parse(text).map(Some).ok_or_else(format_error),
            }
        };
        let range = Range {
            col_lower_bound: bound(1, col_to_index)?,
            row_lower_bound: bound(2, row_to_index)?,
            col_upper_bound: bound(4, col_to_index)?,
            row_upper_bound: bound(5, row_to_index)?,
        };
        let lower_missing = range.col_lower_bound.is_none() && range.row_lower_bound.is_none();
        if captures.get(3).is_some() && lower_missing {
            return Err(format_error().into());
        }
        Ok(range)
    }
}

impl Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_range() {
        let range = Range::try_from("a1:z200").unwrap();
        assert_eq!(range, Range {
            row_lower_bound: Some(0),
            row_upper_bound: Some(199),
            col_lower_bound: Some(0),
            col_upper_bound: Some(25),
        });
        assert_eq!(range.to_a1(), "A1:Z200");
    }

    #[test]
    fn parse_partial_ranges() {
        let columns = Range::try_from("B:D").unwrap();
        assert_eq!(columns.col_lower_bound, Some(1));
        assert_eq!(columns.col_upper_bound, Some(3));
        assert_eq!(columns.row_lower_bound, None);
        assert_eq!(columns.to_a1(), "B:D");

        let rows = Range::try_from("1:10").unwrap();
        assert_eq!(rows.row_lower_bound, Some(0));
        assert_eq!(rows.row_upper_bound, Some(9));
        assert_eq!(rows.to_string(), "1:10");

        assert_eq!(Range::try_from("C3").unwrap().to_a1(), "C3");
        assert!(Range::try_from("").unwrap().is_unbounded());
    }

    #[test]
    fn parse_invalid_range() {
        let error = Range::try_from("A1-B2").unwrap_err();
        assert_eq!(error.to_string(), "Invalid range format 'A1-B2'");
    }

    #[test]
    fn parse_rejects_missing_lower_bound() {
        for value in [":Z200", ":B", ":"] {
            let error = Range::try_from(value).unwrap_err();
            assert_eq!(error.to_string(), format!("Invalid range format '{value}'"));
        }
    }

    #[test]
    fn parse_rejects_bounds_out_of_range() {
        assert!(Range::try_from(&*format!("{}1", "A".repeat(32))).is_err());
        assert!(Range::try_from("A99999999999999999999999:B2").is_err());
        assert!(Range::try_from("A1:B0").is_err());
        assert!(Range::try_from("A0").is_err());
    }

    #[test]
    fn qualify_sheet_name() {
        let window = Range::try_from("A1:Z200").unwrap();
        assert_eq!(window.qualify("GL 4* Overall rankings"), "'GL 4* Overall rankings'!A1:Z200");
        assert_eq!(Range::default().qualify("4* Magicite"), "'4* Magicite'");
        assert_eq!(Range::default().qualify("Kupo's Run"), "'Kupo''s Run'");
    }
}
