use std::collections::HashMap;
use std::time::Duration;

use alfirdaws_core::cart::Cart;
use alfirdaws_core::error::CoreError;
use alfirdaws_core::types::Timestamp;
use tokio::sync::RwLock;
use uuid::Uuid;

/// One open POS terminal.
#[derive(Debug, Clone)]
pub struct PosSession {
    pub cart: Cart,
    pub created_at: Timestamp,
    /// Refreshed on every read or write through the store.
    pub last_active_at: Timestamp,
    /// Set while the cart is being committed as a sale.
    checking_out: bool,
}

impl PosSession {
    fn new() -> Self {
        let now = chrono::Utc::now();
        Self {
            cart: Cart::new(),
            created_at: now,
            last_active_at: now,
            checking_out: false,
        }
    }

    pub fn is_checking_out(&self) -> bool {
        self.checking_out
    }

    fn idle_for(&self, now: Timestamp) -> Duration {
        (now - self.last_active_at).to_std().unwrap_or_default()
    }
}

/// Manages all open POS sessions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Every cart mutation happens under the
/// write lock, so two requests on the same session never interleave.
///
/// A checkout spans a database transaction, so it cannot hold the lock.
/// [`begin_checkout`](Self::begin_checkout) marks the session instead; until
/// [`finish_checkout`](Self::finish_checkout) runs, edits and a second
/// checkout are refused with a conflict.
pub struct PosSessionStore {
    sessions: RwLock<HashMap<Uuid, PosSession>>,
}

impl PosSessionStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Open a session with an empty cart and return its id.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions.write().await.insert(id, PosSession::new());
        id
    }

    /// Snapshot of a session, marking it active.
    pub async fn get(&self, id: Uuid) -> Option<PosSession> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_active_at = chrono::Utc::now();
        Some(session.clone())
    }

    /// Run `f` against a session's cart under the write lock.
    ///
    /// Returns `None` if the session does not exist, and a conflict without
    /// calling `f` while the session is checking out.
    pub async fn with_cart<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut Cart) -> Result<R, CoreError>,
    ) -> Option<Result<R, CoreError>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_active_at = chrono::Utc::now();
        if session.checking_out {
            return Some(Err(checkout_in_progress(id)));
        }
        Some(f(&mut session.cart))
    }

    /// Mark a session as checking out and return a copy of its cart.
    ///
    /// Returns `None` if the session does not exist, and a conflict if a
    /// checkout is already running for it.
    pub async fn begin_checkout(&self, id: Uuid) -> Option<Result<Cart, CoreError>> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id)?;
        session.last_active_at = chrono::Utc::now();
        if session.checking_out {
            return Some(Err(checkout_in_progress(id)));
        }
        session.checking_out = true;
        Some(Ok(session.cart.clone()))
    }

    /// Release a session marked by [`begin_checkout`](Self::begin_checkout).
    /// The cart is emptied when the sale was committed and kept otherwise.
    pub async fn finish_checkout(&self, id: Uuid, sold: bool) {
        let mut sessions = self.sessions.write().await;
        if let Some(session) = sessions.get_mut(&id) {
            session.checking_out = false;
            session.last_active_at = chrono::Utc::now();
            if sold {
                session.cart.clear();
            }
        }
    }

    /// Close a session. Returns `true` if it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    /// Return the current number of open sessions.
    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session idle for at least `max_idle`.
    ///
    /// Returns the number of sessions evicted.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let now = chrono::Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.checking_out || session.idle_for(now) < max_idle);
        before - sessions.len()
    }
}

fn checkout_in_progress(id: Uuid) -> CoreError {
    CoreError::Conflict(format!("POS session {id} is already checking out"))
}

impl Default for PosSessionStore {
    fn default() -> Self {
        Self::new()
    }
}
