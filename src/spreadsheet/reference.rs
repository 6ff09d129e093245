//! Conversions between 0-based grid indices and spreadsheet A1 notation.

const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Converts a 1-based column number to its letter name.
///
/// Column names are bijective base-26 (there is no zero digit):
/// 1 = A, 26 = Z, 27 = AA, 52 = AZ, 53 = BA, ...
/// Column 0 has no name and yields an empty string.
pub fn column_to_name(column: usize) -> String {
    let mut letters = Vec::new();
    let mut remaining = column;
    while remaining > 0 {
        let digit = (remaining - 1) % 26;
        letters.push(ALPHABET[digit]);
        remaining = (remaining - digit) / 26;
    }
    letters.iter().rev().map(|&letter| letter as char).collect()
}

/// Converts column letters (case-insensitive) back to a 1-based column number.
/// Returns None for empty input, anything outside A-Z, or a column number
/// that does not fit in `usize`.
pub fn name_to_column(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |column, letter| {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return None;
        }
        column
            .checked_mul(26)?
            .checked_add(letter as usize - 'A' as usize + 1)
    })
}

/// Parses column letters to a 0-based column index.
pub(crate) fn col_to_index(letters: &str) -> Option<usize> {
    name_to_column(letters).map(|column| column - 1)
}

/// Parses a 1-based row number to a 0-based row index.
/// Row 0 and numbers too large for `usize` yield None.
pub(crate) fn row_to_index(number: &str) -> Option<usize> {
    number
        .parse::<usize>()
        .ok()
        .filter(|row| *row > 0)
        .map(|row| row - 1)
}

/// Returns the A1-style reference for a 0-based (row, col) pair, e.g. (2, 1) => "B3".
pub fn index_to_reference(row: usize, col: usize) -> String {
    format!("{}{}", column_to_name(col + 1), row + 1)
}
