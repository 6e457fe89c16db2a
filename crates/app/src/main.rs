//! SyncNotes demo binary.
//!
//! The bootstrap code the core deliberately excludes: env configuration,
//! tracing setup, and the wiring of store, engine, and scheduler for a demo
//! session. Seeds a few notes the way the UI would and logs what the
//! presentation layer would render until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use syncnotes_core::note::NoteDraft;
use syncnotes_core::search::collection_stats;
use syncnotes_engine::{ReminderScheduler, Session, SyncEngine};
use syncnotes_store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "syncnotes=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let user = std::env::var("SYNCNOTES_USER").unwrap_or_else(|_| "demo".into());
    let poll_secs: u64 = std::env::var("SYNCNOTES_POLL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);

    let store = Arc::new(MemoryStore::new());
    let engine = Arc::new(SyncEngine::new(store));
    engine.start(Session::new(user.clone()))?;
    tracing::info!(%user, "Engine started");

    let scheduler = Arc::new(
        ReminderScheduler::new(engine.notes())
            .with_poll_interval(Duration::from_secs(poll_secs)),
    );

    let cancel = CancellationToken::new();
    {
        let scheduler = scheduler.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { scheduler.run(cancel).await });
    }

    // Log alerts as the scheduler raises them.
    {
        let mut alerts = scheduler.alerts();
        tokio::spawn(async move {
            while alerts.changed().await.is_ok() {
                for alert in alerts.borrow_and_update().iter() {
                    tracing::info!(id = %alert.id, title = %alert.title, "{}", alert.message);
                }
            }
        });
    }

    // Seed a few notes the way the UI would.
    engine
        .create_note(NoteDraft {
            title: "Groceries".to_string(),
            content: "Milk, eggs, coffee".to_string(),
            ..Default::default()
        })
        .await?;
    engine
        .create_note(NoteDraft {
            title: "Stand-up".to_string(),
            content: "Demo the sync engine".to_string(),
            reminder_at: Some(Utc::now() - chrono::Duration::seconds(1)),
            ..Default::default()
        })
        .await?;

    let notes = engine.notes().borrow().clone();
    let stats = collection_stats(&notes);
    tracing::info!(
        total = stats.total,
        with_reminder = stats.with_reminder,
        "Collection seeded"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down");
    cancel.cancel();
    engine.stop();
    Ok(())
}
