//! Background enrichment worker.
//!
//! One store per tick, one geocoding call in flight at a time. The tick
//! interval matches the external service's rate limit, and the worker awaits
//! each unit of work before taking the next tick, so the single-flight
//! guarantee holds even when a call outlives the interval.

mod enrichment;

use std::time::Duration;

use sqlx::PgPool;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use punchmap_core::AppConfig;
use punchmap_geocode::GeocodeClient;

use enrichment::TickOutcome;

/// Handle for the background enrichment loop.
///
/// All durable state lives in the store rows themselves, so the worker can
/// die and restart at any point: a crash mid-tick leaves at most one store
/// in `unchanged`, and it is simply picked up again later.
pub struct EnrichmentScheduler {
    pool: PgPool,
    geocoder: GeocodeClient,
    interval: Duration,
    idle_log_period: Duration,
    worker: Option<(watch::Sender<bool>, JoinHandle<()>)>,
}

impl EnrichmentScheduler {
    #[must_use]
    pub fn new(pool: PgPool, geocoder: GeocodeClient, config: &AppConfig) -> Self {
        Self {
            pool,
            geocoder,
            interval: Duration::from_millis(config.enrichment_interval_ms),
            idle_log_period: Duration::from_secs(config.enrichment_idle_log_secs),
            worker: None,
        }
    }

    /// Spawn the worker loop. Idempotent: a second call while running is a
    /// logged no-op.
    pub fn start(&mut self) {
        if self.worker.is_some() {
            tracing::info!("enrichment: worker already running");
            return;
        }

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(run_worker(
            self.pool.clone(),
            self.geocoder.clone(),
            self.interval,
            self.idle_log_period,
            shutdown_rx,
        ));

        self.worker = Some((shutdown_tx, handle));
        tracing::info!(
            interval_ms = self.interval.as_millis(),
            "enrichment: worker started"
        );
    }

    /// Signal the worker to finish its current unit of work and exit, then
    /// wait for it. No-op when not running.
    pub async fn stop(&mut self) {
        let Some((shutdown_tx, handle)) = self.worker.take() else {
            return;
        };

        let _ = shutdown_tx.send(true);
        if let Err(e) = handle.await {
            tracing::error!(error = %e, "enrichment: worker task panicked");
        }
        tracing::info!("enrichment: worker stopped");
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

/// The worker loop proper.
///
/// `MissedTickBehavior::Delay` plus awaiting the work inside the loop is what
/// makes this single-flight: a geocode call that exceeds the interval simply
/// pushes the next tick out, it never overlaps another call.
async fn run_worker(
    pool: PgPool,
    geocoder: GeocodeClient,
    interval: Duration,
    idle_log_period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut last_idle_log: Option<Instant> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            changed = shutdown.changed() => {
                // A closed channel means the handle was dropped; treat it
                // like a stop signal rather than spinning without ticks.
                if changed.is_err() || *shutdown.borrow() {
                    return;
                }
                continue;
            }
        }

        match enrichment::process_next_store(&pool, &geocoder).await {
            Ok(TickOutcome::Processed) => {}
            Ok(TickOutcome::Idle) => {
                // Log at most once per quiet period; an idle catalog would
                // otherwise produce a line every tick.
                let now = Instant::now();
                let due = last_idle_log
                    .is_none_or(|last| now.duration_since(last) >= idle_log_period);
                if due {
                    tracing::info!("enrichment: no stores need enrichment, waiting");
                    last_idle_log = Some(now);
                }
            }
            Err(e) => {
                // One failed unit of work never stops the loop; the store
                // stays `unchanged` and is retried on a later tick.
                tracing::error!(error = %e, "enrichment: tick failed");
            }
        }
    }
}
