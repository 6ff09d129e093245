//! Delivery of lookup replies.
use crate::error::SpeedrunError;
use crate::spreadsheet::HeaderRun;
use crate::spreadsheet::ResultTable;
use std::io::Write;

/// Destination for user-facing replies (a chat channel, a terminal, ...).
pub trait MessageSink {
    fn send_text(&mut self, text: &str) -> Result<(), SpeedrunError>;

    /// Sends a leaderboard table. The default renders it as text.
    fn send_table(&mut self, headers: &HeaderRun, table: &ResultTable) -> Result<(), SpeedrunError> {
        self.send_text(&render_table(headers, table))
    }
}

/// Writes replies to any `Write`, one message per block.
pub struct ConsoleSink<W: Write> {
    out: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> MessageSink for ConsoleSink<W> {
    fn send_text(&mut self, text: &str) -> Result<(), SpeedrunError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}

/// Renders headers and records as pipe-separated columns padded to a common
/// width. Absent cells render blank; records wider or narrower than the
/// header run are rendered as they are.
pub fn render_table(headers: &HeaderRun, table: &ResultTable) -> String {
    let mut lines: Vec<Vec<String>> = Vec::with_capacity(table.len() + 1);
    lines.push(headers.iter().map(ToString::to_string).collect());
    for record in table {
        lines.push(
            record
                .iter()
                .map(|cell| cell.as_ref().map(ToString::to_string).unwrap_or_default())
                .collect(),
        );
    }

    let columns = lines.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            lines
                .iter()
                .filter_map(|line| line.get(col))
                .map(|text| text.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    lines
        .iter()
        .map(|line| {
            line.iter()
                .zip(&widths)
                .map(|(text, width)| format!("{text:<width$}"))
                .collect::<Vec<_>>()
                .join(" | ")
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
