//! # Leaderboard Lookup
//!
//! Ties the pieces together for one request: resolve the category alias to a
//! sheet, fetch that sheet's grid, find the subcategory label, and read the
//! table underneath it. Replies are rendered through a [`MessageSink`].
use crate::category::normalize_subcategory;
use crate::category::CategoryAliases;
use crate::config::Config;
use crate::error::SpeedrunError;
use crate::sheets::GridSource;
use crate::sheets::SheetsError;
use crate::sink::MessageSink;
use crate::spreadsheet::extract_headers;
use crate::spreadsheet::extract_rows;
use crate::spreadsheet::locate;
use crate::spreadsheet::CellPosition;
use crate::spreadsheet::HeaderRun;
use crate::spreadsheet::Matcher;
use crate::spreadsheet::Range;
use crate::spreadsheet::ResultTable;
use crate::spreadsheet::RowLimit;
use crate::spreadsheet::RowLimitMode;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

/// Reply sent when the data source cannot be reached or authorized.
pub const UNAVAILABLE_MESSAGE: &str = "The bot user has not set up valid Google API credentials yet.";

/// Largest row bound a request may ask for unless configured otherwise.
pub const DEFAULT_MAX_ROWS: usize = 200;

/// A leaderboard request as typed by a user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    /// Row bound, read according to the configured `RowLimitMode`
    pub rows: usize,
    /// Category alias or sheet name
    pub category: String,
    /// Subcategory label searched for inside the sheet
    pub subcategory: String,
}

/// A table found under a subcategory label.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaderboard {
    pub sheet: String,
    pub subcategory: String,
    pub position: CellPosition,
    pub headers: HeaderRun,
    pub table: ResultTable,
}

/// Result of a lookup that reached the data source.
#[derive(Clone, Debug, PartialEq)]
pub enum LookupOutcome {
    Leaderboard(Leaderboard),
    /// The sheet holds no cell matching the subcategory
    SubcategoryNotFound { sheet: String, subcategory: String },
    /// The subcategory was found but no headers sit below it
    UnexpectedLayout {
        sheet: String,
        subcategory: String,
        position: CellPosition,
    },
    /// The data source rejected the sheet name
    InvalidCategory { category: String },
    /// The requested row bound is above the configured maximum
    TooManyRows { requested: usize, max: usize },
}

impl LookupOutcome {
    /// Sends the user-facing reply for this outcome.
    pub fn reply<M: MessageSink>(&self, sink: &mut M) -> Result<(), SpeedrunError> {
        match self {
            LookupOutcome::Leaderboard(leaderboard) => sink.send_table(&leaderboard.headers, &leaderboard.table),
            LookupOutcome::SubcategoryNotFound { sheet, subcategory } => {
                sink.send_text(&format!("Could not find \"{subcategory}\" in {sheet}."))
            }
            LookupOutcome::UnexpectedLayout { sheet, subcategory, .. } => {
                sink.send_text(&format!("\"{subcategory}\" in {sheet} is not formatted as expected."))
            }
            LookupOutcome::InvalidCategory { category } => {
                sink.send_text(&format!("Invalid speedrun category \"{category}\"."))
            }
            LookupOutcome::TooManyRows { requested, max } => {
                sink.send_text(&format!("Cannot show {requested} rows, the limit is {max}."))
            }
        }
    }
}

/// Leaderboard lookups against one grid source.
pub struct Speedrun<S: GridSource> {
    source: S,
    aliases: CategoryAliases,
    window: Range,
    matcher: Matcher,
    row_limit: RowLimitMode,
    max_rows: usize,
}

impl<S: GridSource> Speedrun<S> {
    /// Creates a lookup with built-in aliases, loose matching, absolute row
    /// bounds and a row bound of at most [`DEFAULT_MAX_ROWS`].
    pub fn new(source: S) -> Self {
        Self {
            source,
            aliases: CategoryAliases::default(),
            window: Range::default(),
            matcher: Matcher::default(),
            row_limit: RowLimitMode::default(),
            max_rows: DEFAULT_MAX_ROWS,
        }
    }

    /// Creates a lookup using the aliases, window, matcher, row-limit mode and
    /// row cap from `config`.
    pub fn from_config(source: S, config: &Config) -> Result<Self, SpeedrunError> {
        Ok(Self::new(source)
            .with_aliases(config.aliases())
            .with_window(config.window()?)
            .with_matcher(config.matcher()?)
            .with_row_limit(config.row_limit_mode()?)
            .with_max_rows(config.max_rows))
    }

    pub fn with_aliases(mut self, aliases: CategoryAliases) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_window(mut self, window: Range) -> Self {
        self.window = window;
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_row_limit(mut self, row_limit: RowLimitMode) -> Self {
        self.row_limit = row_limit;
        self
    }

    /// Caps the row bound a request may ask for.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Runs a lookup.
    ///
    /// # Arguments
    ///
    /// * `request` - The rows, category and subcategory asked for
    ///
    /// # Returns
    ///
    /// * `Result<LookupOutcome, SpeedrunError>` - The table or the reason there is none
    ///
    /// # Errors
    ///
    /// Fails only when the data source fails for a reason other than
    /// rejecting the requested range.
    pub fn lookup(&mut self, request: &Lookup) -> Result<LookupOutcome, SpeedrunError> {
        if request.rows > self.max_rows {
            info!(requested = request.rows, max = self.max_rows, "Row bound above limit");
            return Ok(LookupOutcome::TooManyRows {
                requested: request.rows,
                max: self.max_rows,
            });
        }
        let sheet = self.aliases.resolve(&request.category);
        let subcategory = normalize_subcategory(&request.subcategory);
        let range = self.window.qualify(&sheet);
        debug!(category = request.category.as_str(), sheet = sheet.as_str(), range = range.as_str(), "Resolved category");

        let grid = match self.source.fetch(&range) {
            Ok(grid) => grid,
            Err(SheetsError::InvalidRange { message, .. }) => {
                warn!(category = request.category.as_str(), "Sheet rejected: {message}");
                return Ok(LookupOutcome::InvalidCategory {
                    category: request.category.to_lowercase(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        debug!(rows = grid.height(), cols = grid.width(), "Fetched grid");

        let Some(position) = locate(&subcategory, &grid, self.matcher) else {
            info!(sheet = sheet.as_str(), subcategory = subcategory.as_str(), "Subcategory not found");
            return Ok(LookupOutcome::SubcategoryNotFound { sheet, subcategory });
        };

        let headers = extract_headers(&grid, &position);
        if headers.is_empty() {
            warn!(sheet = sheet.as_str(), reference = position.reference().as_str(), "No headers below subcategory");
            return Ok(LookupOutcome::UnexpectedLayout {
                sheet,
                subcategory,
                position,
            });
        }

        let table = extract_rows(&grid, &position, &headers, RowLimit::new(self.row_limit, request.rows));
        info!(
            sheet = sheet.as_str(),
            reference = position.reference().as_str(),
            columns = headers.len(),
            records = table.len(),
            "Extracted leaderboard"
        );
        Ok(LookupOutcome::Leaderboard(Leaderboard {
            sheet,
            subcategory,
            position,
            headers,
            table,
        }))
    }

    /// Runs a lookup and sends the reply. Upstream failures are logged, answered
    /// with [`UNAVAILABLE_MESSAGE`], and returned.
    pub fn respond<M: MessageSink>(&mut self, request: &Lookup, sink: &mut M) -> Result<LookupOutcome, SpeedrunError> {
        match self.lookup(request) {
            Ok(outcome) => {
                outcome.reply(sink)?;
                Ok(outcome)
            }
            Err(e) => {
                error!("Lookup failed: {e}");
                sink.send_text(UNAVAILABLE_MESSAGE)?;
                Err(e)
            }
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spreadsheet::CellValue;
    use crate::spreadsheet::Grid;
    use std::collections::HashMap;

    /// In-memory source keyed by request range; unknown ranges are rejected like the API does.
    #[derive(Default)]
    struct FakeSource {
        sheets: HashMap<String, Grid>,
        requests: Vec<String>,
        down: bool,
    }

    impl FakeSource {
        fn with(range: &str, grid: Grid) -> Self {
            let mut source = Self::default();
            source.sheets.insert(range.to_owned(), grid);
            source
        }
    }

    impl GridSource for FakeSource {
        fn fetch(&mut self, range: &str) -> Result<Grid, SheetsError> {
            self.requests.push(range.to_owned());
            if self.down {
                return Err(SheetsError::Api {
                    status: 401,
                    message: "Request had invalid authentication credentials.".to_owned(),
                });
            }
            self.sheets.get(range).cloned().ok_or_else(|| SheetsError::InvalidRange {
                range: range.to_owned(),
                message: format!("Unable to parse range: {range}"),
            })
        }
    }

    #[derive(Default)]
    struct Recorder {
        messages: Vec<String>,
        tables: Vec<(HeaderRun, ResultTable)>,
    }

    impl MessageSink for Recorder {
        fn send_text(&mut self, text: &str) -> Result<(), SpeedrunError> {
            self.messages.push(text.to_owned());
            Ok(())
        }

        fn send_table(&mut self, headers: &HeaderRun, table: &ResultTable) -> Result<(), SpeedrunError> {
            self.tables.push((headers.clone(), table.clone()));
            Ok(())
        }
    }

    fn overall() -> Grid {
        Grid::from_text([
            vec!["GL 4* Overall rankings"],
            vec![],
            vec!["", "Marilith"],
            vec!["", "Rank", "Name", "Time", "", "notes"],
            vec!["", "1", "Ann", "0:41"],
            vec!["", "2", "Bob", "0:44"],
            vec!["", "3", "Cy"],
            vec!["", "4", "Dee", "0:52"],
            vec!["", "Kraken"],
            vec!["", ""],
        ])
    }

    fn request(rows: usize, category: &str, subcategory: &str) -> Lookup {
        Lookup {
            rows,
            category: category.to_owned(),
            subcategory: subcategory.to_owned(),
        }
    }

    fn text(value: &str) -> Option<CellValue> {
        Some(CellValue::from(value))
    }

    #[test]
    fn lookup_absolute_rows() {
        let mut speedrun = Speedrun::new(FakeSource::with("'GL 4* Overall rankings'", overall()));
        let outcome = speedrun.lookup(&request(6, "overall", "marilith")).unwrap();

        let LookupOutcome::Leaderboard(leaderboard) = outcome else {
            panic!("expected a leaderboard, got {outcome:?}");
        };
        assert_eq!(leaderboard.sheet, "GL 4* Overall rankings");
        assert_eq!(leaderboard.subcategory, "Marilith");
        assert_eq!(leaderboard.position.reference(), "B3");
        assert_eq!(leaderboard.headers.len(), 3);
        assert_eq!(leaderboard.table, vec![
            vec![text("1"), text("Ann"), text("0:41")],
            vec![text("2"), text("Bob"), text("0:44")],
            vec![text("3"), text("Cy"), None],
        ]);
    }

    #[test]
    fn lookup_counted_rows_with_window() {
        let source = FakeSource::with("'GL 4* Overall rankings'!A1:F10", overall());
        let mut speedrun = Speedrun::new(source)
            .with_window(Range::try_from("A1:F10").unwrap())
            .with_row_limit(RowLimitMode::Count);
        let outcome = speedrun.lookup(&request(2, "OVERALL", "Marilith")).unwrap();

        let LookupOutcome::Leaderboard(leaderboard) = outcome else {
            panic!("expected a leaderboard, got {outcome:?}");
        };
        assert_eq!(leaderboard.table.len(), 2);
        assert_eq!(leaderboard.table[1][1], text("Bob"));
        assert_eq!(speedrun.source().requests, vec!["'GL 4* Overall rankings'!A1:F10"]);
    }

    #[test]
    fn lookup_falls_back_to_title_cased_sheet() {
        let mut speedrun = Speedrun::new(FakeSource::with("'Torgen Raid'", overall()));
        let outcome = speedrun.lookup(&request(5, "torgen raid", "Marilith")).unwrap();
        assert!(matches!(outcome, LookupOutcome::Leaderboard(_)));
    }

    #[test]
    fn lookup_missing_subcategory() {
        let mut speedrun = Speedrun::new(FakeSource::with("'GL 4* Overall rankings'", overall()));
        let outcome = speedrun.lookup(&request(6, "overall", "tiamat")).unwrap();
        assert_eq!(outcome, LookupOutcome::SubcategoryNotFound {
            sheet: "GL 4* Overall rankings".to_owned(),
            subcategory: "Tiamat".to_owned(),
        });
    }

    #[test]
    fn lookup_unexpected_layout() {
        let mut speedrun = Speedrun::new(FakeSource::with("'GL 4* Overall rankings'", overall()));
        let outcome = speedrun.lookup(&request(12, "overall", "kraken")).unwrap();
        assert!(matches!(outcome, LookupOutcome::UnexpectedLayout { ref position, .. } if position.reference() == "B9"));
    }

    #[test]
    fn lookup_invalid_category() {
        let mut speedrun = Speedrun::new(FakeSource::default());
        let outcome = speedrun.lookup(&request(6, "Nope", "Marilith")).unwrap();
        assert_eq!(outcome, LookupOutcome::InvalidCategory {
            category: "nope".to_owned(),
        });
    }

    #[test]
    fn lookup_upstream_failure() {
        let mut source = FakeSource::with("'GL 4* Overall rankings'", overall());
        source.down = true;
        let mut speedrun = Speedrun::new(source);
        let error = speedrun.lookup(&request(6, "overall", "Marilith")).unwrap_err();
        assert!(matches!(error, SpeedrunError::SheetsError(SheetsError::Api { status: 401, .. })));
    }

    #[test]
    fn lookup_rejects_rows_above_limit() {
        let mut speedrun = Speedrun::new(FakeSource::with("'GL 4* Overall rankings'", overall())).with_max_rows(6);
        let outcome = speedrun.lookup(&request(5_000_000, "overall", "Marilith")).unwrap();
        assert_eq!(outcome, LookupOutcome::TooManyRows {
            requested: 5_000_000,
            max: 6,
        });
        assert!(speedrun.source().requests.is_empty());
        assert!(matches!(speedrun.lookup(&request(6, "overall", "Marilith")).unwrap(), LookupOutcome::Leaderboard(_)));

        let mut default_cap = Speedrun::new(FakeSource::default());
        let outcome = default_cap.lookup(&request(DEFAULT_MAX_ROWS + 1, "overall", "Marilith")).unwrap();
        assert!(matches!(outcome, LookupOutcome::TooManyRows { max: DEFAULT_MAX_ROWS, .. }));
    }

    #[test]
    fn from_config_applies_settings() {
        let config = Config::parse("matcher = \"exact\"\nrow_limit = \"count\"\nmax_rows = 1\n[aliases]\nbosses = \"GL 4* Overall rankings\"").unwrap();
        let mut speedrun = Speedrun::from_config(FakeSource::with("'GL 4* Overall rankings'", overall()), &config).unwrap();
        let outcome = speedrun.lookup(&request(1, "bosses", "Marilith")).unwrap();
        let LookupOutcome::Leaderboard(leaderboard) = outcome else {
            panic!("expected a leaderboard, got {outcome:?}");
        };
        assert_eq!(leaderboard.table, vec![vec![text("1"), text("Ann"), text("0:41")]]);
        assert!(matches!(speedrun.lookup(&request(2, "bosses", "Marilith")).unwrap(), LookupOutcome::TooManyRows { max: 1, .. }));
    }

    #[test]
    fn respond_sends_replies() {
        let mut speedrun = Speedrun::new(FakeSource::with("'GL 4* Overall rankings'", overall()));
        let mut sink = Recorder::default();

        speedrun.respond(&request(5, "overall", "Marilith"), &mut sink).unwrap();
        speedrun.respond(&request(5, "overall", "Tiamat"), &mut sink).unwrap();
        speedrun.respond(&request(5, "overall", "Kraken"), &mut sink).unwrap();
        speedrun.respond(&request(5, "magicite", "Tiamat"), &mut sink).unwrap();
        speedrun.respond(&request(500, "overall", "Marilith"), &mut sink).unwrap();

        assert_eq!(sink.tables.len(), 1);
        assert_eq!(sink.tables[0].1.len(), 2);
        assert_eq!(sink.messages, vec![
            "Could not find \"Tiamat\" in GL 4* Overall rankings.",
            "\"Kraken\" in GL 4* Overall rankings is not formatted as expected.",
            "Invalid speedrun category \"magicite\".",
            "Cannot show 500 rows, the limit is 200.",
        ]);
    }

    #[test]
    fn respond_reports_unavailable() {
        let mut source = FakeSource::default();
        source.down = true;
        let mut speedrun = Speedrun::new(source);
        let mut sink = Recorder::default();

        assert!(speedrun.respond(&request(5, "overall", "Marilith"), &mut sink).is_err());
        assert_eq!(sink.messages, vec![UNAVAILABLE_MESSAGE]);
    }
}
