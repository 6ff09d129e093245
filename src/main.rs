use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use speedrun_sheet::lookup::UNAVAILABLE_MESSAGE;
use speedrun_sheet::sheets::SheetsClient;
use speedrun_sheet::sink::ConsoleSink;
use speedrun_sheet::sink::MessageSink;
use speedrun_sheet::Config;
use speedrun_sheet::Lookup;
use speedrun_sheet::Speedrun;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Look up speedrun leaderboard entries in the shared spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "speedrun", version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Label matching: loose or exact
    #[arg(long)]
    matcher: Option<String>,

    /// How <ROWS> bounds the table: absolute (last row index) or count
    #[arg(long)]
    row_limit: Option<String>,

    /// Largest <ROWS> accepted
    #[arg(long)]
    max_rows: Option<usize>,

    /// Row bound for the returned table
    rows: usize,

    /// Category alias (overall, no-csb, cod, magicite) or sheet name
    category: String,

    /// Subcategory label, e.g. "Marilith"
    #[arg(required = true, num_args = 1..)]
    subcategory: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path).with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    if let Some(matcher) = args.matcher {
        config.matcher = matcher;
    }
    if let Some(row_limit) = args.row_limit {
        config.row_limit = row_limit;
    }
    if let Some(max_rows) = args.max_rows {
        config.max_rows = max_rows;
    }

    let mut sink = ConsoleSink::stdout();
    let client = match SheetsClient::new(config.sheets()) {
        Ok(client) => client,
        Err(e) => {
            error!("Unable to load credentials: {e}");
            sink.send_text(UNAVAILABLE_MESSAGE)?;
            return Err(e).context("Failed to create Sheets client");
        }
    };

    let mut speedrun = Speedrun::from_config(client, &config).context("Invalid configuration")?;
    let request = Lookup {
        rows: args.rows,
        category: args.category,
        subcategory: args.subcategory.join(" "),
    };
    speedrun
        .respond(&request, &mut sink)
        .context("Leaderboard lookup failed")?;
    Ok(())
}
