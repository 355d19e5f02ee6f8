//! Fixed-interval scheduler for poll cycles
//!
//! This module handles:
//! - Ticking at the configured interval after the initial refresh
//! - Skipping ticks that arrive while a cycle is still running
//! - Dropping the in-flight cycle and closing the session on shutdown

use crate::poll::coordinator::PollCoordinator;
use crate::state::PollState;
use std::future::Future;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Runs poll cycles until `shutdown` resolves
///
/// The first scheduled cycle fires one interval from now; the caller is
/// expected to have run `first_refresh()` already. Cycles never overlap:
/// ticks missed while a cycle was in flight are skipped rather than queued.
///
/// When `shutdown` resolves, any in-flight cycle is dropped without
/// publishing a result and the portal session is closed before returning.
///
/// # Arguments
///
/// * `coordinator` - The coordinator to drive
/// * `shutdown` - Future that resolves when polling should stop
/// * `on_cycle` - Called with the published state after every completed cycle
pub async fn run<F, C>(coordinator: &mut PollCoordinator, shutdown: F, mut on_cycle: C)
where
    F: Future<Output = ()>,
    C: FnMut(&PollState),
{
    let period = coordinator.interval();
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);
    tracing::info!("Polling every {}s", period.as_secs());

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }

        let started = Instant::now();
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown requested, abandoning in-flight poll cycle");
                break;
            }
            result = coordinator.refresh() => {
                if result.is_err() {
                    tracing::debug!(
                        "Keeping cached reading after failed cycle ({} of {} failed)",
                        coordinator.state().failures,
                        coordinator.state().cycles
                    );
                }
                on_cycle(coordinator.state());
            }
        }

        if started.elapsed() > period {
            tracing::warn!(
                "Poll cycle took {:?}, longer than the {:?} interval; skipping missed ticks",
                started.elapsed(),
                period
            );
        }
    }

    coordinator.shutdown();
    tracing::info!("Polling stopped");
}
