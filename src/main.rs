//! Application entry point.
//!
//! Wires the in-memory adapters into the handlers and starts the
//! lifecycle scheduler. Everything is constructed here and passed down;
//! nothing reaches for globals.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use atp_membership::adapters::memory::{
    InMemoryLifecycleEventLog, InMemoryMembershipStore, RecordingNotificationSender,
};
use atp_membership::application::lifecycle::{ExpirationSweep, LifecycleScheduler, ReminderSweep};
use atp_membership::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    info!(
        annual_fee = config.membership.annual_fee,
        scheduler_enabled = config.scheduler.enabled,
        "configuration loaded"
    );

    let store = Arc::new(InMemoryMembershipStore::new());
    let notifications = Arc::new(RecordingNotificationSender::new());
    let event_log = Arc::new(InMemoryLifecycleEventLog::new());

    let scheduler = Arc::new(LifecycleScheduler::new(
        Arc::new(ExpirationSweep::new(
            store.clone(),
            notifications.clone(),
            event_log.clone(),
        )),
        Arc::new(ReminderSweep::new(
            store.clone(),
            notifications.clone(),
            config.membership.renewal_reminder_window_days,
        )),
        config.scheduler.clone(),
    ));

    if config.scheduler.enabled {
        scheduler.start().await;
    } else {
        info!("scheduler disabled by configuration");
    }

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler.stop().await;
    Ok(())
}
