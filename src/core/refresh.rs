//! Live refresh controller.
//!
//! While a user is signed in, one background task keeps their [`DashboardState`]
//! current. It re-runs [`load_dashboard`] on three triggers: a fixed polling interval,
//! a change to the user's transactions and a change to their profile. Triggers are
//! handled one at a time in a single task, so fetches never overlap, and any triggers
//! that pile up during a fetch collapse into the next one.
//!
//! Consumers read the state through a [`watch`] channel. Dropping the
//! [`RefreshHandle`] (or calling [`RefreshHandle::shutdown`]) stops the timer and
//! releases both subscriptions.

use crate::{
    config::settings::AppConfig,
    core::{
        calendar,
        dashboard::{DashboardState, load_dashboard},
        store::{Store, Subscription, Table},
    },
    errors::Result,
};
use chrono::NaiveDate;
use std::time::Duration;
use tokio::{
    sync::{oneshot, watch},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info, trace};

/// How the controller runs.
#[derive(Debug, Clone, Copy)]
pub struct RefreshOptions {
    /// Time between polling refreshes
    pub interval: Duration,
    /// Rows in the recent-transactions list
    pub recent_limit: u64,
    /// Source of "today" for each recompute
    pub today: fn() -> NaiveDate,
}

impl Default for RefreshOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            recent_limit: 5,
            today: calendar::today,
        }
    }
}

impl RefreshOptions {
    /// Options taken from the loaded settings.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            interval: config.refresh.interval(),
            recent_limit: config.dashboard.recent_limit,
            ..Self::default()
        }
    }
}

/// A running refresh task for one user.
#[derive(Debug)]
pub struct RefreshHandle {
    user_id: String,
    state: watch::Receiver<DashboardState>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Starts refreshing `user_id`'s dashboard.
    ///
    /// Both subscriptions are opened before this returns, so no change made after the
    /// call can be missed. The first fetch starts immediately.
    #[must_use]
    pub fn spawn(store: Store, user_id: &str, options: RefreshOptions) -> Self {
        let transactions = store.subscribe(Table::Transactions, user_id);
        let profiles = store.subscribe(Table::Profiles, user_id);
        let (state_tx, state_rx) = watch::channel(DashboardState::loading());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = Worker {
            store,
            user_id: user_id.to_string(),
            options,
            transactions,
            profiles,
            state: state_tx,
        };
        let task = tokio::spawn(worker.run(shutdown_rx));
        info!(
            "Live refresh started for {} (every {:?})",
            user_id, options.interval
        );

        Self {
            user_id: user_id.to_string(),
            state: state_rx,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    /// User being refreshed
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// A receiver for the dashboard state.
    #[must_use]
    pub fn state(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Stops the task and waits for it to finish.
    ///
    /// # Errors
    /// `Error::RefreshTask` if the task panicked.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown.take() {
            // The task may already be gone
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await?;
        }
        info!("Live refresh stopped for {}", self.user_id);
        Ok(())
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Live refresh for {} aborted on drop", self.user_id);
        }
    }
}

struct Worker {
    store: Store,
    user_id: String,
    options: RefreshOptions,
    transactions: Subscription,
    profiles: Subscription,
    state: watch::Sender<DashboardState>,
}

impl Worker {
    async fn run(mut self, mut shutdown: oneshot::Receiver<()>) {
        self.refresh().await;

        let interval = self.options.interval;
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    debug!("Refresh task for {} received shutdown", self.user_id);
                    return;
                }
                _ = ticker.tick() => trace!("Polling refresh for {}", self.user_id),
                change = self.transactions.changed() => match change {
                    Some(kind) => debug!("Transactions changed for {}: {:?}", self.user_id, kind),
                    None => return,
                },
                change = self.profiles.changed() => match change {
                    Some(kind) => debug!("Profile changed for {}: {:?}", self.user_id, kind),
                    None => return,
                },
            }

            self.refresh().await;
        }
    }

    async fn refresh(&mut self) {
        let pending = self.transactions.drain() + self.profiles.drain();
        if pending > 0 {
            trace!("Coalesced {} pending changes for {}", pending, self.user_id);
        }

        let today = (self.options.today)();
        let result = load_dashboard(&self.store, &self.user_id, today, self.options.recent_limit).await;
        if let Err(e) = &result {
            error!("Dashboard refresh for {} failed: {}", self.user_id, e);
        }
        self.state.send_modify(|state| state.apply(result));
    }
}

/// Keeps exactly one [`RefreshHandle`] alive for whoever is signed in.
pub struct LiveRefresh {
    store: Store,
    options: RefreshOptions,
    active: Option<RefreshHandle>,
}

impl LiveRefresh {
    /// A controller with nobody signed in.
    #[must_use]
    pub fn new(store: Store, options: RefreshOptions) -> Self {
        Self {
            store,
            options,
            active: None,
        }
    }

    /// Switches to `user_id`, or stops refreshing when `None`.
    ///
    /// Setting the user that is already active does nothing.
    pub async fn set_user(&mut self, user_id: Option<&str>) -> Result<()> {
        if self.active.as_ref().map(RefreshHandle::user_id) == user_id {
            return Ok(());
        }
        self.stop().await?;
        if let Some(user_id) = user_id {
            self.active = Some(RefreshHandle::spawn(self.store.clone(), user_id, self.options));
        }
        Ok(())
    }

    /// The running handle, if someone is signed in
    #[must_use]
    pub fn handle(&self) -> Option<&RefreshHandle> {
        self.active.as_ref()
    }

    /// Stops the running handle, if any.
    pub async fn stop(&mut self) -> Result<()> {
        match self.active.take() {
            Some(handle) => handle.shutdown().await,
            None => Ok(()),
        }
    }
}
