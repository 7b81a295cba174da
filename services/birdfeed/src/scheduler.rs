//! Timer entry point: one sync cycle per tick until rocket shuts down.
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rocket::fairing::AdHoc;
use tokio::time::{interval, MissedTickBehavior};

use crate::context::AppContext;
use crate::sync::{SyncEngine, SyncOutcome};

/// Starts the poller at liftoff, if polling is enabled.
pub fn fairing() -> AdHoc {
    AdHoc::on_liftoff("Sync poller", |rocket| {
        Box::pin(async move {
            let Some(context) = rocket.state::<AppContext>() else {
                tracing::error!("no app context managed, poller not started");
                return;
            };
            let Some(every) = context.poll_every else {
                tracing::info!("polling disabled");
                return;
            };
            tracing::info!(every_secs = every.as_secs(), "starting poller");
            tokio::spawn(poll(context.sync.clone(), every, rocket.shutdown()));
        })
    })
}

pub async fn poll(engine: Arc<SyncEngine>, every: Duration, shutdown: impl Future<Output = ()>) {
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => tick(&engine).await,
            () = &mut shutdown => {
                tracing::info!("poller stopped");
                break;
            }
        }
    }
}

async fn tick(engine: &SyncEngine) {
    match engine.run_cycle().await {
        Ok(SyncOutcome::Synced(batch)) => tracing::info!(count = batch.len(), "poll stored new posts"),
        Ok(SyncOutcome::None) => tracing::debug!("poll found nothing new"),
        Ok(SyncOutcome::InFlight) => tracing::info!("previous poll still running"),
        // Already logged by the engine; the next tick retries.
        Err(_) => {}
    }
}
