#![allow(clippy::result_large_err)]

use budget_pulse::{
    config::{database, settings, users},
    core::{
        calendar,
        refresh::{LiveRefresh, RefreshHandle, RefreshOptions},
        report::format_dashboard,
        store::Store,
        transaction::seed_sample_data,
    },
    errors::{Error, Result},
};
use chrono::Datelike;
use dotenvy::dotenv;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Settings and the signed-in user
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let user_id = users::current_user_id().inspect_err(|_| {
        error!("{} is not set; nobody to show a dashboard for", users::USER_ENV_VAR);
    })?;

    // 4. Store
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db).await?;
    let store = Store::new(db);

    // 5. Sample data for first-time users
    if app_config.dashboard.seed_sample_data {
        let year = calendar::today().year();
        let inserted = seed_sample_data(&store, &user_id, year).await?;
        if inserted > 0 {
            info!("Inserted {} sample transactions for {}", inserted, user_id);
        }
    }

    // 6. Keep the dashboard live until interrupted
    let symbol = app_config.dashboard.currency_symbol.clone();
    let mut live = LiveRefresh::new(store, RefreshOptions::from_config(&app_config));
    live.set_user(Some(&user_id)).await?;

    let mut state = live
        .handle()
        .map(RefreshHandle::state)
        .ok_or(Error::MissingUser)?;

    loop {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                info!("Interrupt received, shutting down.");
                break;
            }
            changed = state.changed() => {
                if changed.is_err() {
                    warn!("Refresh task ended unexpectedly.");
                    break;
                }
                let current = state.borrow_and_update().clone();
                if let Some(notice) = &current.notice {
                    warn!("{}", notice);
                }
                if let Some(snapshot) = &current.snapshot {
                    info!("Refresh #{}\n{}", current.refreshes, format_dashboard(snapshot, &symbol));
                }
            }
        }
    }

    live.stop().await
}
