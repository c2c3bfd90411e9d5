//! Workers that drain the queue and apply requests to the bank.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Amount;
use crate::bank::Bank;
use crate::model::{Instruction, TransactionRequest};
use crate::pacing::{self, Interrupted};
use crate::queue::WorkQueue;

/// Processor tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// Wall-clock time after which the worker stops taking new requests.
    pub run_budget: Duration,
    /// How long one receive waits before re-checking the stop conditions.
    pub receive_timeout: Duration,
    /// Upper bound (exclusive) of the random pause after each request.
    pub max_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            run_budget: Duration::from_secs(10),
            receive_timeout: Duration::from_secs(5),
            max_delay: Duration::from_millis(1000),
            seed: None,
        }
    }
}

/// Counters owned by a single worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProcessorStats {
    /// Every request taken off the queue except the sentinel.
    pub total: usize,
    pub deposits: usize,
    /// Successful withdrawals only.
    pub withdrawals: usize,
    /// Requests refused by the bank (insufficient funds or unknown account).
    pub rejected: usize,
    /// Sum of applied deposits.
    pub deposited: Amount,
    /// Sum of applied withdrawals, as a magnitude.
    pub withdrawn: Amount,
}

/// Why a worker stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The run budget elapsed.
    Budget,
    /// The worker consumed the sentinel.
    Sentinel,
    /// A stop request arrived while waiting.
    Interrupted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::Budget => "run budget elapsed",
            StopReason::Sentinel => "received sentinel",
            StopReason::Interrupted => "interrupted",
        })
    }
}

/// Final state of one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorReport {
    pub name: String,
    pub stats: ProcessorStats,
    pub stop: StopReason,
}

/// One consumer worker.
pub struct Processor {
    name: String,
    bank: Arc<Bank>,
    queue: Arc<WorkQueue>,
    config: ProcessorConfig,
    stop: CancellationToken,
    rng: StdRng,
    stats: ProcessorStats,
}

impl Processor {
    pub fn new(
        name: impl Into<String>,
        bank: Arc<Bank>,
        queue: Arc<WorkQueue>,
        config: ProcessorConfig,
        stop: CancellationToken,
    ) -> Self {
        let rng = pacing::rng(config.seed);
        Self {
            name: name.into(),
            bank,
            queue,
            config,
            stop,
            rng,
            stats: ProcessorStats::default(),
        }
    }

    /// Process requests until the budget elapses, the sentinel arrives, or a stop request lands.
    pub async fn run(mut self) -> ProcessorReport {
        let stop = match self.process().await {
            Ok(reason) => reason,
            Err(Interrupted) => {
                warn!(worker = %self.name, "processor interrupted");
                StopReason::Interrupted
            }
        };

        info!(
            worker = %self.name,
            total = self.stats.total,
            deposits = self.stats.deposits,
            withdrawals = self.stats.withdrawals,
            rejected = self.stats.rejected,
            reason = %stop,
            "processor stopped"
        );
        ProcessorReport {
            name: self.name,
            stats: self.stats,
            stop,
        }
    }

    async fn process(&mut self) -> Result<StopReason, Interrupted> {
        let started = Instant::now();

        while started.elapsed() < self.config.run_budget {
            if self.stop.is_cancelled() {
                return Err(Interrupted);
            }

            let Some(request) = self.receive().await? else {
                debug!(worker = %self.name, "no request within timeout");
                continue;
            };
            if request.is_sentinel() {
                return Ok(StopReason::Sentinel);
            }

            self.apply(request);

            let delay = pacing::jitter(&mut self.rng, self.config.max_delay);
            pacing::sleep(delay, &self.stop).await?;
        }

        Ok(StopReason::Budget)
    }

    async fn receive(&self) -> Result<Option<TransactionRequest>, Interrupted> {
        tokio::select! {
            biased;
            _ = self.stop.cancelled() => Err(Interrupted),
            request = self.queue.receive(self.config.receive_timeout) => Ok(request),
        }
    }

    /// Apply one request and update the counters. Rejections are logged, never fatal.
    fn apply(&mut self, request: TransactionRequest) {
        let account = request.account();
        let instruction = request.instruction();

        let result = match instruction {
            Instruction::Deposit(amount) => self.bank.deposit(account, amount),
            Instruction::Withdrawal(amount) => self.bank.withdraw(account, amount),
            Instruction::Stop => return,
        };
        self.stats.total += 1;

        match result {
            Ok(balance) => {
                match instruction {
                    Instruction::Deposit(amount) => {
                        self.stats.deposits += 1;
                        self.stats.deposited += amount;
                    }
                    Instruction::Withdrawal(amount) => {
                        self.stats.withdrawals += 1;
                        self.stats.withdrawn += amount;
                    }
                    Instruction::Stop => {}
                }
                info!(
                    worker = %self.name,
                    account,
                    amount = %request.amount(),
                    balance = %balance,
                    "transaction applied"
                );
            }
            Err(e) => {
                self.stats.rejected += 1;
                warn!(
                    worker = %self.name,
                    account,
                    amount = %request.amount(),
                    reason = %e,
                    "transaction rejected"
                );
            }
        }
    }
}
