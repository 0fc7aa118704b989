use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use playtime::application::calculator::PtoCalculator;
use playtime::domain::accrual::Classification;
use playtime::domain::board::{GridConfig, generate_board};
use playtime::domain::level::{MAX_LEVEL, next_grid_config, points_per_pair, time_for_level};
use playtime::domain::ports::SnapshotStoreBox;
use playtime::domain::pto::Hours;
use playtime::domain::session::GameSession;
use playtime::infrastructure::file::FileSnapshotStore;
use playtime::infrastructure::in_memory::InMemorySnapshotStore;
#[cfg(feature = "storage-rocksdb")]
use playtime::infrastructure::rocksdb::RocksDBStore;
use playtime::interfaces::csv::pay_period_writer::PayPeriodWriter;
use playtime::interfaces::csv::spend_reader::SpendReader;
use playtime::interfaces::terminal::{board_view, play};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and print a single board
    Board {
        #[arg(long, default_value_t = 4)]
        width: usize,
        #[arg(long, default_value_t = 4)]
        height: usize,
        /// Number of distinct categories
        #[arg(long, default_value_t = 6)]
        options: usize,
        /// Seed for a reproducible board
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print the board size, points and time budget of every level
    Levels,
    /// Play the matching game in the terminal
    Play {
        /// Seed for reproducible boards
        #[arg(long)]
        seed: Option<u64>,
        /// Countdown tick length in milliseconds
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Project PTO balances across pay periods and print them as CSV
    Pto(PtoArgs),
}

#[derive(Args)]
struct PtoArgs {
    /// First day of the first pay period (YYYY-MM-DD)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// PTO hours available at the start of the first period
    #[arg(long)]
    starting_balance: Option<Decimal>,

    /// Number of pay periods to project
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    periods: Option<u32>,

    /// `staff` or `physician`
    #[arg(long)]
    classification: Option<Classification>,

    /// Whole years of service
    #[arg(long)]
    years: Option<u32>,

    /// CSV file of `period,spend` rows (1-based periods)
    #[arg(long)]
    spend: Option<PathBuf>,

    /// Start from defaults instead of saved state
    #[arg(long)]
    reset: bool,

    /// Directory to keep calculator state in between runs
    #[arg(long, env = "PLAYTIME_STATE_DIR")]
    state_dir: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Board {
            width,
            height,
            options,
            seed,
        } => {
            let mut rng = seeded_rng(seed);
            let board = generate_board(GridConfig::new(width, height, options), &mut rng)?;
            print!("{}", board_view::render_board(&board, None, |_| false));
        }
        Commands::Levels => {
            println!("level,width,height,options,points_per_pair,time_ms");
            for level in 1..=MAX_LEVEL {
                let config = next_grid_config(level);
                println!(
                    "{},{},{},{},{},{}",
                    level,
                    config.width,
                    config.height,
                    config.option_count,
                    points_per_pair(level),
                    time_for_level(level)
                );
            }
        }
        Commands::Play { seed, tick_ms } => {
            let mut session = GameSession::new(seeded_rng(seed));
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let stdout = io::stdout();
            let mut out = stdout.lock();
            play::run(
                &mut session,
                stdin,
                &mut out,
                Duration::from_millis(tick_ms.max(1)),
            )
            .await?;
        }
        Commands::Pto(args) => run_pto(args).await?,
    }

    Ok(())
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn open_store(args: &PtoArgs) -> Result<SnapshotStoreBox> {
    if let Some(db_path) = &args.db_path {
        #[cfg(feature = "storage-rocksdb")]
        {
            let store = RocksDBStore::open(db_path)?;
            return Ok(Arc::new(store));
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        tracing::warn!(
            path = %db_path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back."
        );
    }

    let store: SnapshotStoreBox = match &args.state_dir {
        Some(dir) => Arc::new(FileSnapshotStore::new(dir)),
        None => Arc::new(InMemorySnapshotStore::new()),
    };
    Ok(store)
}

async fn run_pto(args: PtoArgs) -> Result<()> {
    let store = open_store(&args)?;
    let mut calculator = PtoCalculator::new(store, Local::now().date_naive());

    if args.reset {
        calculator.reset();
    } else {
        calculator.restore().await?;
    }

    if let Some(periods) = args.periods {
        calculator.set_pay_period_count(periods);
    }
    if let Some(date) = args.start_date {
        calculator.set_start_date(date)?;
    }
    if let Some(balance) = args.starting_balance {
        calculator.set_initial_pto(Hours::new(balance));
    }
    if let Some(classification) = args.classification {
        calculator.set_classification(classification);
    }
    if let Some(years) = args.years {
        calculator.set_years_of_service(years);
    }

    if let Some(path) = &args.spend {
        let file = File::open(path).into_diagnostic()?;
        for entry in SpendReader::new(file).entries() {
            match entry {
                Ok(entry) => match entry.index().filter(|&i| i < calculator.periods().len()) {
                    Some(index) => {
                        calculator.edit_spend(index, &entry.spend);
                        calculator.blur_spend(index, &entry.spend);
                    }
                    None => {
                        tracing::warn!(
                            "Ignoring spend for period {}: no such period",
                            entry.period
                        );
                    }
                },
                Err(e) => tracing::warn!("Error reading spend entry: {}", e),
            }
        }
    }

    tracing::info!(rate = %calculator.accrual_rate(), "accrual rate per pay period");
    if let Some(period) = calculator.periods().iter().find(|p| p.balance.is_negative()) {
        tracing::warn!(
            "Balance goes negative in the pay period starting {}",
            period.start.format("%m/%d/%Y")
        );
    }

    {
        let stdout = io::stdout();
        let mut writer = PayPeriodWriter::new(stdout.lock());
        writer.write_periods(calculator.periods())?;
    }

    calculator.flush().await?;
    Ok(())
}
