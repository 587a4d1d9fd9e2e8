mod import;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::{error, info};
use thiserror::Error;
use tokio::sync::broadcast;

use reelstats::analytics::{find_snapshot, list_snapshots, summarize, AggregationError};
use reelstats::{
    load_config, AggregationSettings, Config, ConfigError, DailyAggregator, DailyScheduler,
    Database, DocumentStore, ReelstatsError, SqliteStore,
};

use import::ImportError;

#[derive(Parser, Debug)]
#[command(name = "reelstats", version, about = "Daily analytics aggregation for the streaming catalog")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database, overriding the configured path.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Aggregate one day (yesterday by default) and write its snapshot.
    Run {
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Print the snapshot without writing it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Aggregate every day in an inclusive range.
    Backfill {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Run on the configured daily schedule until interrupted.
    Serve {
        /// Aggregate yesterday immediately, then wait for the schedule.
        #[arg(long)]
        run_now: bool,
    },
    /// Print the stored snapshot for a day.
    Show {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Print stored snapshots in a range, oldest first.
    List {
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Print range totals instead of individual days.
        #[arg(long)]
        summary: bool,
    },
    /// Load a JSON array of documents (each with a string "id") into a collection.
    Import {
        #[arg(long)]
        collection: String,
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.json_logs) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Everything the CLI can fail with. Library failures arrive as
/// [`ReelstatsError`]; the rest belong to this binary.
#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Reelstats(#[from] ReelstatsError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("No snapshot stored for {0}")]
    SnapshotNotFound(NaiveDate),
}

impl From<AggregationError> for CliError {
    fn from(e: AggregationError) -> Self {
        Self::Reelstats(e.into())
    }
}

struct Context {
    config: Config,
    store: Arc<dyn DocumentStore>,
    aggregator: Arc<DailyAggregator>,
}

/// Loads configuration, opens the database and builds the aggregator.
fn open_context(cli: &Cli) -> reelstats::Result<Context> {
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    let db_path = cli
        .database
        .clone()
        .or_else(|| config.resolve_database_path())
        .ok_or_else(|| ConfigError::Validation {
            message: "could not determine a database path; pass --database".to_string(),
        })?;
    let db = Database::open(&db_path)?;
    let store: Arc<dyn DocumentStore> = Arc::new(SqliteStore::new(db));

    let settings = AggregationSettings::from_config(&config)?;
    let aggregator = Arc::new(DailyAggregator::new(Arc::clone(&store), settings));

    Ok(Context {
        config,
        store,
        aggregator,
    })
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Context {
        config,
        store,
        aggregator,
    } = open_context(&cli)?;

    match cli.command {
        Command::Run { date, dry_run } => {
            let date = date.unwrap_or_else(|| aggregator.yesterday());
            let snapshot = if dry_run {
                aggregator.preview(date).await?
            } else {
                aggregator.run_with_timeout(date).await?
            };
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Command::Backfill { from, to } => {
            let snapshots = aggregator.backfill(from, to).await?;
            info!("Backfilled {} days", snapshots.len());
        }
        Command::Serve { run_now } => serve(aggregator, &config, run_now).await?,
        Command::Show { date } => match find_snapshot(store.as_ref(), date).await? {
            Some(snapshot) => println!("{}", serde_json::to_string_pretty(&snapshot)?),
            None => return Err(CliError::SnapshotNotFound(date)),
        },
        Command::List { from, to, summary } => {
            let snapshots = list_snapshots(store.as_ref(), from, to).await?;
            if summary {
                println!("{}", serde_json::to_string_pretty(&summarize(&snapshots))?);
            } else {
                println!("{}", serde_json::to_string_pretty(&snapshots)?);
            }
        }
        Command::Import { collection, file } => {
            let count = import::import_file(store.as_ref(), &collection, &file).await?;
            println!("Imported {} documents into '{}'", count, collection);
        }
    }

    Ok(())
}

async fn serve(
    aggregator: Arc<DailyAggregator>,
    config: &Config,
    run_now: bool,
) -> reelstats::Result<()> {
    let scheduler = DailyScheduler::from_config(aggregator, config)?;
    let (trigger_tx, trigger_rx) = broadcast::channel(4);
    let handle = scheduler.start(trigger_rx)?;

    if run_now {
        let _ = trigger_tx.send(());
    }

    let (stop_tx, mut stop_rx) = tokio::sync::mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(());
    })
    .map_err(|e| ReelstatsError::Scheduler(format!("failed to install signal handler: {}", e)))?;

    info!(
        "Scheduler running on '{}' in {}; press Ctrl-C to stop",
        config.schedule, config.timezone
    );
    stop_rx.recv().await;

    info!("Stopping scheduler");
    scheduler.stop();
    tokio::task::spawn_blocking(move || handle.join())
        .await
        .map_err(|e| ReelstatsError::Scheduler(e.to_string()))?
        .map_err(|_| ReelstatsError::Scheduler("scheduler thread panicked".to_string()))?;

    Ok(())
}
