//! The single producer of random transaction load.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::Amount;
use crate::bank::Bank;
use crate::model::{AccountId, TransactionRequest};
use crate::pacing::{self, Interrupted};
use crate::queue::WorkQueue;

/// Generator tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of requests to produce before stopping.
    pub iterations: usize,
    /// Amounts are drawn uniformly from `[-amount_bound, amount_bound)`.
    pub amount_bound: f64,
    /// Upper bound (exclusive) of the random pause after each request.
    pub max_delay: Duration,
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            iterations: 10,
            amount_bound: 10_000.0,
            max_delay: Duration::from_millis(1000),
            seed: None,
        }
    }
}

/// Outcome of one generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorReport {
    /// Requests submitted, not counting the sentinel.
    pub submitted: usize,
    /// Whether a stop request cut the run short.
    pub cancelled: bool,
}

/// Produces random deposits and withdrawals, then always submits one sentinel.
pub struct Generator {
    bank: Arc<Bank>,
    queue: Arc<WorkQueue>,
    config: GeneratorConfig,
    stop: CancellationToken,
    rng: StdRng,
}

impl Generator {
    pub fn new(
        bank: Arc<Bank>,
        queue: Arc<WorkQueue>,
        config: GeneratorConfig,
        stop: CancellationToken,
    ) -> Self {
        let rng = pacing::rng(config.seed);
        Self {
            bank,
            queue,
            config,
            stop,
            rng,
        }
    }

    /// Run to completion or until stopped. The sentinel is submitted exactly once either way.
    pub async fn run(mut self) -> GeneratorReport {
        let mut report = GeneratorReport::default();

        if let Err(Interrupted) = self.generate(&mut report).await {
            warn!(submitted = report.submitted, "generator interrupted");
            report.cancelled = true;
        }

        self.queue.submit(TransactionRequest::sentinel());
        info!(submitted = report.submitted, "generator terminated");
        report
    }

    async fn generate(&mut self, report: &mut GeneratorReport) -> Result<(), Interrupted> {
        for _ in 0..self.config.iterations {
            if self.stop.is_cancelled() {
                return Err(Interrupted);
            }

            let Some(request) = self.next_request() else {
                warn!("no accounts to target, generator stopping early");
                return Ok(());
            };
            debug!(%request, "submitting");
            self.queue.submit(request);
            report.submitted += 1;

            let delay = pacing::jitter(&mut self.rng, self.config.max_delay);
            pacing::sleep(delay, &self.stop).await?;
        }
        Ok(())
    }

    /// Build a request against a random existing account, or `None` if there are no accounts.
    fn next_request(&mut self) -> Option<TransactionRequest> {
        let account = self.pick_account()?;
        Some(TransactionRequest::new(account, self.pick_amount()))
    }

    fn pick_account(&mut self) -> Option<AccountId> {
        let ids = self.bank.account_ids();
        if ids.is_empty() {
            return None;
        }
        Some(ids[self.rng.random_range(0..ids.len())])
    }

    fn pick_amount(&mut self) -> Amount {
        let bound = self.config.amount_bound;
        if bound <= 0.0 {
            return Amount::ZERO;
        }
        Amount::from_float(self.rng.random_range(-bound..bound))
    }
}
