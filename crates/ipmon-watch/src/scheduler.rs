//! Check orchestration and the polling loop.
//!
//! One check captures the current snapshot, compares it with the saved one,
//! mails a report on change, and saves the current snapshot. The loop runs
//! a check every `interval_secs` until the process is interrupted.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use uuid::Uuid;

use ipmon_core::{report, SnapshotStore, StoreError};

use crate::config::WatchConfig;
use crate::error::Result;
use crate::notify::Notifier;
use crate::probe::SnapshotProvider;

/// What a single check found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No saved snapshot yet; the current one was saved.
    FirstRun,
    Unchanged,
    /// A change was reported and the new snapshot saved.
    Changed,
}

#[derive(Debug, Clone)]
pub struct CheckReport {
    pub check_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub outcome: CheckOutcome,
    pub duration: Duration,
}

/// Subject line of the change notification.
pub fn change_subject(hostname: &str) -> String {
    format!("Network configuration changed on {hostname}")
}

/// Execute a single check: capture → load previous → diff → notify → save.
///
/// Store errors other than a missing snapshot abort the check. A failed
/// notification aborts before saving, so the next check reports the same
/// change again.
pub async fn run_check<P, S, N>(provider: &P, store: &S, notifier: &N) -> Result<CheckReport>
where
    P: SnapshotProvider,
    S: SnapshotStore,
    N: Notifier,
{
    let check_id = Uuid::new_v4();
    let started_at = Utc::now();
    let start = Instant::now();

    tracing::info!(check_id = %check_id, "Checking network configuration");

    let current = provider.capture()?;

    let outcome = match store.load() {
        Ok(previous) => {
            tracing::info!(check_id = %check_id, "Found previous configuration");

            if current.is_changed(&previous) {
                tracing::info!(
                    check_id = %check_id,
                    hostname = %current.hostname(),
                    "Network configuration changed"
                );
                let body = report(&current, Some(&previous));
                let recipients = notifier.recipients()?;
                notifier
                    .notify(&change_subject(current.hostname()), &body, &recipients)
                    .await?;
                tracing::info!(check_id = %check_id, "Change notification sent");
                CheckOutcome::Changed
            } else {
                tracing::info!(check_id = %check_id, "No changes detected");
                CheckOutcome::Unchanged
            }
        }
        Err(StoreError::NotFound { .. }) => {
            tracing::info!(check_id = %check_id, "Previous configuration not found");
            CheckOutcome::FirstRun
        }
        Err(e) => return Err(e.into()),
    };

    store.save(&current)?;
    tracing::info!(
        check_id = %check_id,
        address_count = current.count(),
        "Current configuration saved"
    );

    Ok(CheckReport {
        check_id,
        started_at,
        outcome,
        duration: start.elapsed(),
    })
}

/// Owns the configuration and collaborators for repeated checks.
pub struct Watcher<P, S, N> {
    config: WatchConfig,
    provider: P,
    store: S,
    notifier: N,
}

impl<P, S, N> Watcher<P, S, N>
where
    P: SnapshotProvider,
    S: SnapshotStore,
    N: Notifier,
{
    pub fn new(config: WatchConfig, provider: P, store: S, notifier: N) -> Self {
        Self {
            config,
            provider,
            store,
            notifier,
        }
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// Run one check and return its result.
    pub async fn run_once(&self) -> Result<CheckReport> {
        run_check(&self.provider, &self.store, &self.notifier).await
    }

    /// Check every `interval_secs` until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_until(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => tracing::info!("Interrupt received, stopping"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for interrupt"),
            }
        })
        .await
    }

    /// Check every `interval_secs` until `shutdown` completes.
    ///
    /// The first check happens one full interval after start. Failed checks
    /// are logged and the loop keeps going; checks never overlap.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        self.config.validate()?;

        let period = Duration::from_secs(self.config.interval_secs);
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        tracing::info!(interval_secs = self.config.interval_secs, "Watcher started");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(check) => tracing::info!(
                            check_id = %check.check_id,
                            outcome = ?check.outcome,
                            duration = ?check.duration,
                            "Check complete"
                        ),
                        Err(e) => tracing::error!(error = %e, "Check failed"),
                    }
                }
            }
        }

        tracing::info!("Bye");
        Ok(())
    }
}
