use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bank_sim::csv::{read_accounts, write_balances};
use bank_sim::{Account, AccountId, Amount, Bank, Simulation, SimulationConfig};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Accounts opened when no seed file is given.
const DEFAULT_ACCOUNTS: [(AccountId, i64); 3] =
    [(12345, 10_000), (12346, 5_000), (12347, 15_000)];

#[derive(Parser)]
#[command(name = "bank-sim")]
#[command(about = "Concurrent bank transaction simulation")]
#[command(version)]
struct Cli {
    /// CSV file with `account,balance` rows to open
    #[arg(short, long)]
    accounts: Option<PathBuf>,

    /// Number of processor workers
    #[arg(short, long, default_value = "2")]
    workers: usize,

    /// How long the generator runs before being stopped (e.g. "10s", "500ms")
    #[arg(short, long, default_value = "10s")]
    duration: humantime::Duration,

    /// Number of transactions the generator produces
    #[arg(long, default_value = "10")]
    iterations: usize,

    /// Upper bound of the random pause between transactions
    #[arg(long, default_value = "1s")]
    max_delay: humantime::Duration,

    /// Wall-clock budget of each processor
    #[arg(long, default_value = "10s")]
    budget: humantime::Duration,

    /// How long a processor waits on an empty queue before re-checking its budget
    #[arg(long, default_value = "5s")]
    receive_timeout: humantime::Duration,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Print final balances as csv instead of the text summary
    #[arg(long)]
    csv: bool,
}

impl Cli {
    fn config(&self) -> SimulationConfig {
        let config = SimulationConfig::default()
            .with_workers(self.workers)
            .with_run_duration(*self.duration)
            .with_iterations(self.iterations)
            .with_max_delay(*self.max_delay)
            .with_run_budget(*self.budget)
            .with_receive_timeout(*self.receive_timeout);
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Open the seed accounts. Rows that fail are skipped with a warning.
    fn open_accounts(&self) -> Result<Bank, Box<dyn std::error::Error>> {
        let bank = Bank::new();
        match &self.accounts {
            Some(path) => {
                for result in read_accounts(path)? {
                    match result {
                        Ok(account) => bank.add_account(account),
                        Err(e) => warn!("{e}"),
                    }
                }
            }
            None => {
                for (id, units) in DEFAULT_ACCOUNTS {
                    match Account::new(id, Amount::from_units(units)) {
                        Ok(account) => bank.add_account(account),
                        Err(e) => warn!("error creating account: {e}"),
                    }
                }
            }
        }
        Ok(bank)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let bank = Arc::new(cli.open_accounts()?);

    let simulation = Simulation::new(bank, cli.config());
    let shutdown = simulation.shutdown_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping");
            shutdown.cancel();
        }
    });

    let report = simulation.run().await;

    if cli.csv {
        write_balances(io::stdout().lock(), report.balances)?;
    } else {
        print!("{report}");
    }

    Ok(())
}
