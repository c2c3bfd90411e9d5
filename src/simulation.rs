//! Wires the generator and the processor pool together and decides when they stop.
//!
//! The run ends through three independent signals:
//! - after `run_duration` the generator is told to stop, and it answers with one sentinel,
//! - each processor gives up once its own run budget is spent,
//! - the shutdown token (Ctrl-C in the binary) interrupts everything at the next wait.
//!
//! Only one sentinel is ever sent, so with several processors only one of them
//! stops on it. The others run until their budget elapses.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::Amount;
use crate::bank::Bank;
use crate::generator::{Generator, GeneratorConfig, GeneratorReport};
use crate::model::AccountId;
use crate::processor::{Processor, ProcessorConfig, ProcessorReport};
use crate::queue::WorkQueue;

/// Settings for one simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Number of processor tasks.
    pub workers: usize,
    /// How long the generator may run before it is told to stop.
    pub run_duration: Duration,
    pub generator: GeneratorConfig,
    pub processor: ProcessorConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            run_duration: Duration::from_secs(10),
            generator: GeneratorConfig::default(),
            processor: ProcessorConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_run_duration(mut self, run_duration: Duration) -> Self {
        self.run_duration = run_duration;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.generator.iterations = iterations;
        self
    }

    /// Upper bound of the pacing pause for both the generator and the processors.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.generator.max_delay = max_delay;
        self.processor.max_delay = max_delay;
        self
    }

    pub fn with_run_budget(mut self, run_budget: Duration) -> Self {
        self.processor.run_budget = run_budget;
        self
    }

    pub fn with_receive_timeout(mut self, receive_timeout: Duration) -> Self {
        self.processor.receive_timeout = receive_timeout;
        self
    }

    /// Seed the generator with `seed` and processor `i` with `seed + 1 + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator.seed = Some(seed);
        self.processor.seed = Some(seed.wrapping_add(1));
        self
    }
}

/// Everything the driver reports once all tasks have stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationReport {
    /// Final balances, sorted by account id.
    pub balances: Vec<(AccountId, Amount)>,
    pub generator: Option<GeneratorReport>,
    /// In worker order.
    pub processors: Vec<ProcessorReport>,
    /// Requests still queued when every processor had stopped.
    pub undelivered: usize,
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (account, balance) in &self.balances {
            writeln!(f, "Account {account} has a balance of {balance}.")?;
        }
        if let Some(generator) = &self.generator {
            writeln!(
                f,
                "Transaction generator terminated after submitting {} transactions.",
                generator.submitted
            )?;
        }
        for report in &self.processors {
            writeln!(
                f,
                "{} finished processing {} transactions, including {} deposits, and {} withdrawals.",
                report.name, report.stats.total, report.stats.deposits, report.stats.withdrawals
            )?;
        }
        if self.undelivered > 0 {
            writeln!(f, "{} transactions were left unprocessed.", self.undelivered)?;
        }
        Ok(())
    }
}

enum Finished {
    Generator(GeneratorReport),
    Processor(usize, ProcessorReport),
}

/// One run of the bank simulation over a pre-seeded bank.
pub struct Simulation {
    bank: Arc<Bank>,
    queue: Arc<WorkQueue>,
    config: SimulationConfig,
    shutdown: CancellationToken,
}

impl Simulation {
    pub fn new(bank: Arc<Bank>, config: SimulationConfig) -> Self {
        Self::with_queue(bank, Arc::new(WorkQueue::new()), config)
    }

    /// Use an existing queue, e.g. one already holding requests.
    pub fn with_queue(bank: Arc<Bank>, queue: Arc<WorkQueue>, config: SimulationConfig) -> Self {
        Self {
            bank,
            queue,
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that interrupts every task when cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run the generator and processors to completion and collect the final state.
    pub async fn run(self) -> SimulationReport {
        let mut tasks = JoinSet::new();
        let generator_stop = self.shutdown.child_token();

        let generator = Generator::new(
            Arc::clone(&self.bank),
            Arc::clone(&self.queue),
            self.config.generator.clone(),
            generator_stop.clone(),
        );
        tasks.spawn(async move { Finished::Generator(generator.run().await) });

        for index in 0..self.config.workers {
            let mut config = self.config.processor.clone();
            config.seed = config.seed.map(|seed| seed.wrapping_add(index as u64));
            let processor = Processor::new(
                format!("Thread-{index}"),
                Arc::clone(&self.bank),
                Arc::clone(&self.queue),
                config,
                self.shutdown.clone(),
            );
            tasks.spawn(async move { Finished::Processor(index, processor.run().await) });
        }
        info!(
            workers = self.config.workers,
            accounts = self.bank.len(),
            "simulation started"
        );

        tokio::select! {
            _ = tokio::time::sleep(self.config.run_duration) => {}
            _ = self.shutdown.cancelled() => {}
        }
        generator_stop.cancel();

        let mut generator = None;
        let mut processors = Vec::with_capacity(self.config.workers);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Finished::Generator(report)) => generator = Some(report),
                Ok(Finished::Processor(index, report)) => processors.push((index, report)),
                Err(e) => error!(error = %e, "simulation task failed"),
            }
        }
        processors.sort_unstable_by_key(|(index, _)| *index);

        let report = SimulationReport {
            balances: self.bank.balances(),
            generator,
            processors: processors.into_iter().map(|(_, report)| report).collect(),
            undelivered: self.queue.len(),
        };
        info!(undelivered = report.undelivered, "simulation finished");
        report
    }
}
