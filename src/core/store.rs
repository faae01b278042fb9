//! The store client: a database connection plus a change feed.
//!
//! A [`Store`] is constructed once by the caller and handed to every operation. Writes
//! that go through this crate publish a [`ChangeEvent`]; the live refresh controller
//! subscribes per table and per user and treats every event as an opaque "something
//! changed" signal.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::{debug, trace, warn};

/// Number of change events buffered per subscriber before it starts lagging.
const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Tables that publish change events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// `transactions`
    Transactions,
    /// `profiles`
    Profiles,
}

/// Kind of change that happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A row was inserted
    Insert,
    /// A row was updated
    Update,
    /// A row was deleted
    Delete,
    /// The subscriber fell behind and some events were dropped
    Missed,
}

/// One change notification, scoped to a table and a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// Table the change happened in
    pub table: Table,
    /// Owner of the changed row
    pub user_id: String,
    /// What happened
    pub kind: ChangeKind,
}

/// Database connection and change feed, shared by cloning.
#[derive(Clone)]
pub struct Store {
    db: Arc<DatabaseConnection>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl Store {
    /// Wraps an open connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { db: Arc::new(db), changes }
    }

    /// The underlying connection
    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Opens a change subscription for one table and one user.
    #[must_use]
    pub fn subscribe(&self, table: Table, user_id: &str) -> Subscription {
        debug!("Subscribing to {:?} changes for user {}", table, user_id);
        Subscription {
            receiver: self.changes.subscribe(),
            table,
            user_id: user_id.to_string(),
        }
    }

    /// Publishes a change. Having no subscribers is not an error.
    pub fn notify(&self, table: Table, user_id: &str, kind: ChangeKind) {
        let event = ChangeEvent {
            table,
            user_id: user_id.to_string(),
            kind,
        };
        match self.changes.send(event) {
            Ok(receivers) => trace!("Change {:?} on {:?} sent to {} receivers", kind, table, receivers),
            Err(_) => trace!("Change {:?} on {:?} had no receivers", kind, table),
        }
    }

    /// Number of live subscriptions (all tables, all users)
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.changes.receiver_count()
    }
}

/// A user-scoped view of the change feed for one table.
///
/// Dropping the subscription releases it.
#[derive(Debug)]
pub struct Subscription {
    receiver: broadcast::Receiver<ChangeEvent>,
    table: Table,
    user_id: String,
}

impl Subscription {
    /// Waits for the next matching change.
    ///
    /// Returns `None` once the store has been dropped. A lagged receiver reports
    /// [`ChangeKind::Missed`], which callers should treat like any other change.
    pub async fn changed(&mut self) -> Option<ChangeKind> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.matches(&event) => return Some(event.kind),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!(
                        "{:?} subscription for {} lagged by {} events",
                        self.table, self.user_id, skipped
                    );
                    return Some(ChangeKind::Missed);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Discards every change already queued and returns how many of them matched.
    pub fn drain(&mut self) -> usize {
        let mut matched = 0;
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.matches(&event) {
                        matched += 1;
                    }
                }
                Err(TryRecvError::Lagged(_)) => matched += 1,
                Err(TryRecvError::Empty | TryRecvError::Closed) => return matched,
            }
        }
    }

    fn matches(&self, event: &ChangeEvent) -> bool {
        event.table == self.table && event.user_id == self.user_id
    }
}
