//! Session state machine for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `SessionStore` is the only writer of [`SessionState`]. The router guard asks
//! it whether the session is confirmed, pages call `login`/`logout`, and the
//! resource layer reports 401s back through [`SessionStore::observe_failure`].
//! One store exists per page load; `app` creates it and injects it through
//! Leptos context.
//!
//! DESIGN
//! ======
//! - Optimistic start: `check_auth` seeds the state from the durable snapshot
//!   before the server answers. That identity is `Authenticated` but not
//!   `confirmed`; only a round trip in this page load confirms it.
//! - Generations: login, register, logout and invalidation advance a
//!   generation counter. A network result is committed only if the
//!   generation it started under is still current, so a slow response can
//!   never resurrect a session that was cleared after it was sent.
//! - Concurrent `fetch_user` calls within one generation share the request
//!   in flight instead of racing each other.
//!
//! TRADE-OFFS
//! ==========
//! Transient failures (5xx, network, unreadable body) during `fetch_user` keep
//! the last known identity and only record the error. Only a 401 ends the
//! session. A flaky network therefore never signs the user out, at the cost
//! of showing stale identity data until the server is reachable again.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use serde::{Deserialize, Serialize};

use crate::config::ConsoleConfig;
use crate::net::api::ResourceClient;
use crate::net::auth::AuthGateway;
use crate::net::types::{AuthError, FieldErrors, Identity, Payload};
use crate::util::ui_persistence::{SnapshotStorage, load_json, save_json};

/// Where the session stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unauthenticated,
    /// Credentials submitted, waiting for the server.
    Authenticating,
    Authenticated,
    /// The last attempt failed and no identity is held.
    Failed,
}

/// Read-only view of the session handed to observers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Present iff `status` is `Authenticated`.
    pub identity: Option<Identity>,
    /// Whether `identity` was confirmed by the server during this page load.
    pub confirmed: bool,
    pub last_error: Option<AuthError>,
    /// Field errors from the last validation failure.
    pub field_errors: FieldErrors,
    /// A session request started by the store is in flight.
    pub loading: bool,
}

impl SessionState {
    /// Authenticated, possibly only optimistically. Fine for rendering, not
    /// for access decisions.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.status == SessionStatus::Authenticated
    }

    /// Authenticated and confirmed by the server.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.is_authenticated() && self.confirmed
    }

    #[must_use]
    pub fn last_error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }
}

/// Result of [`SessionStore::logout`]. Local state is cleared either way.
#[derive(Clone, Debug, PartialEq)]
pub enum LogoutOutcome {
    Clean,
    /// The server call failed; the local session was still cleared.
    RemoteFailed(AuthError),
}

/// Durable snapshot blob.
#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    identity: Identity,
}

type FetchResult = Result<Identity, AuthError>;

struct InFlight {
    generation: u64,
    waiters: Vec<oneshot::Sender<FetchResult>>,
}

type Observer = Rc<dyn Fn(&SessionState)>;

/// Single authority over [`SessionState`].
pub struct SessionStore {
    gateway: AuthGateway,
    storage: Rc<dyn SnapshotStorage>,
    snapshot_key: String,
    state: RefCell<SessionState>,
    generation: Cell<u64>,
    fetch_in_flight: RefCell<Option<InFlight>>,
    observers: RefCell<Vec<Observer>>,
}

impl SessionStore {
    #[must_use]
    pub fn new(client: Rc<dyn ResourceClient>, storage: Rc<dyn SnapshotStorage>, config: &ConsoleConfig) -> Self {
        Self {
            gateway: AuthGateway::new(client, config.endpoints.clone()),
            storage,
            snapshot_key: config.snapshot_key.clone(),
            state: RefCell::new(SessionState::default()),
            generation: Cell::new(0),
            fetch_in_flight: RefCell::new(None),
            observers: RefCell::new(Vec::new()),
        }
    }

    // =========================================================================
    // READ / OBSERVE
    // =========================================================================

    /// Copy of the current state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Authenticated and confirmed by the server during this page load.
    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        self.state.borrow().is_confirmed()
    }

    /// Current generation; advances whenever the session identity is reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Call `observer` after every state change, for the life of the store.
    pub fn subscribe(&self, observer: impl Fn(&SessionState) + 'static) {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Sign in, then fetch the identity the server bound to the session.
    ///
    /// # Errors
    ///
    /// Returns the failure of either step; the session is then `Failed` with
    /// identity and snapshot cleared. Returns [`AuthError::Superseded`] if a
    /// newer session operation started meanwhile.
    pub async fn login(&self, credentials: &Payload) -> Result<(), AuthError> {
        let generation = self.advance_generation();
        self.update(|s| {
            s.status = SessionStatus::Authenticating;
            s.identity = None;
            s.confirmed = false;
            s.last_error = None;
            s.field_errors.clear();
            s.loading = true;
        });

        let outcome = match self.gateway.login(credentials).await {
            Ok(_) => self.gateway.current_user().await,
            Err(err) => Err(err),
        };
        if !self.is_current(generation) {
            return Err(AuthError::Superseded);
        }

        match outcome {
            Ok(identity) => {
                leptos::logging::log!("signed in as user {}", identity.id);
                self.confirm(identity);
                Ok(())
            }
            Err(err) => {
                self.storage.remove(&self.snapshot_key);
                self.update(|s| {
                    s.status = SessionStatus::Failed;
                    s.identity = None;
                    s.confirmed = false;
                    s.field_errors = err.field_errors().cloned().unwrap_or_default();
                    s.last_error = Some(err.clone());
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    /// Clear the local session, then tell the server. The local side always
    /// succeeds; a server failure is only reported.
    pub async fn logout(&self) -> LogoutOutcome {
        self.advance_generation();
        self.clear_local(None);

        match self.gateway.logout().await {
            Ok(()) => LogoutOutcome::Clean,
            Err(err) => {
                leptos::logging::warn!("server logout failed, local session already cleared: {err}");
                LogoutOutcome::RemoteFailed(err)
            }
        }
    }

    /// Confirm the session with the server.
    ///
    /// Success marks the session confirmed and refreshes the snapshot. A 401
    /// clears everything. Any other failure keeps the current identity and
    /// only records the error.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, or [`AuthError::Superseded`] when the
    /// generation changed before the answer arrived.
    pub async fn fetch_user(&self) -> FetchResult {
        let generation = self.generation.get();
        let joined = {
            let mut in_flight = self.fetch_in_flight.borrow_mut();
            match in_flight.as_mut() {
                Some(pending) if pending.generation == generation => {
                    let (tx, rx) = oneshot::channel();
                    pending.waiters.push(tx);
                    Some(rx)
                }
                _ => {
                    *in_flight = Some(InFlight { generation, waiters: Vec::new() });
                    None
                }
            }
        };
        if let Some(rx) = joined {
            return rx.await.unwrap_or(Err(AuthError::Superseded));
        }

        self.update(|s| {
            s.last_error = None;
            s.loading = true;
        });
        let fetched = self.gateway.current_user().await;

        let waiters = {
            let mut in_flight = self.fetch_in_flight.borrow_mut();
            if in_flight.as_ref().is_some_and(|p| p.generation == generation) {
                in_flight.take().map(|p| p.waiters).unwrap_or_default()
            } else {
                Vec::new()
            }
        };

        let result = if self.is_current(generation) {
            self.commit_fetch(fetched)
        } else {
            leptos::logging::log!("discarding user fetch from an earlier session generation");
            Err(AuthError::Superseded)
        };
        for waiter in waiters {
            let _ = waiter.send(result.clone());
        }
        result
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns the failure; validation errors are also kept in
    /// `field_errors`. An existing session is not cleared by a rejected
    /// registration.
    pub async fn register(&self, user_data: &Payload) -> Result<(), AuthError> {
        let generation = self.advance_generation();
        self.update(|s| {
            s.last_error = None;
            s.field_errors.clear();
            s.loading = true;
        });

        let outcome = match self.gateway.register(user_data).await {
            Ok(_) => self.gateway.current_user().await,
            Err(err) => Err(err),
        };
        if !self.is_current(generation) {
            return Err(AuthError::Superseded);
        }

        match outcome {
            Ok(identity) => {
                self.confirm(identity);
                Ok(())
            }
            Err(err) => {
                self.settle_failure(&err);
                Err(err)
            }
        }
    }

    /// Restore the snapshot optimistically, then confirm with the server.
    /// Runs once at startup and never fails; the state converges to whatever
    /// the server says.
    pub async fn check_auth(&self) {
        self.restore_snapshot();
        match self.fetch_user().await {
            Ok(identity) => leptos::logging::log!("session confirmed for user {}", identity.id),
            Err(AuthError::Superseded) => {}
            Err(err) if err.is_authorization_denied() => leptos::logging::log!("no active session"),
            Err(err) => leptos::logging::warn!("session check failed, keeping stored identity: {err}"),
        }
    }

    /// Seed an unconfirmed identity from the durable snapshot. Returns whether
    /// one was restored. An unreadable snapshot is removed.
    pub fn restore_snapshot(&self) -> bool {
        if self.state.borrow().identity.is_some() {
            return false;
        }
        let Some(snapshot) = load_json::<Snapshot>(self.storage.as_ref(), &self.snapshot_key) else {
            return false;
        };
        self.update(|s| {
            s.status = SessionStatus::Authenticated;
            s.identity = Some(snapshot.identity);
            s.confirmed = false;
        });
        true
    }

    /// Send a password reset link. Returns the server's message, if any.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; authentication status is untouched.
    pub async fn request_password_reset(&self, data: &Payload) -> Result<Option<String>, AuthError> {
        self.begin_form_request();
        let outcome = self.gateway.request_password_reset(data).await;
        self.finish_form_request(outcome)
    }

    /// Set a new password with a reset token. Returns the server's message.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; authentication status is untouched.
    pub async fn reset_password(&self, data: &Payload) -> Result<Option<String>, AuthError> {
        self.begin_form_request();
        let outcome = self.gateway.reset_password(data).await;
        self.finish_form_request(outcome)
    }

    /// Drop the last error and any field errors.
    pub fn clear_error(&self) {
        let dirty = {
            let state = self.state.borrow();
            state.last_error.is_some() || !state.field_errors.is_empty()
        };
        if !dirty {
            return;
        }
        self.update(|s| {
            s.last_error = None;
            s.field_errors.clear();
        });
    }

    /// Error-classification hook for every network result outside the auth
    /// gateway. A 401 for a request issued in the current generation ends the
    /// session; anything else, or a stale request, is ignored.
    pub fn observe_failure(&self, issued_in: u64, err: &AuthError) {
        if !err.is_authorization_denied() || !self.is_current(issued_in) {
            return;
        }
        if self.state.borrow().identity.is_none() {
            return;
        }
        leptos::logging::warn!("server rejected the session, signing out locally");
        self.advance_generation();
        self.clear_local(Some(err.clone()));
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn advance_generation(&self) -> u64 {
        let next = self.generation.get() + 1;
        self.generation.set(next);
        // Joined fetches from the old generation resolve as superseded.
        self.fetch_in_flight.borrow_mut().take();
        next
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn commit_fetch(&self, fetched: FetchResult) -> FetchResult {
        match fetched {
            Ok(identity) => {
                self.confirm(identity.clone());
                Ok(identity)
            }
            Err(err) => {
                self.settle_failure(&err);
                Err(err)
            }
        }
    }

    fn confirm(&self, identity: Identity) {
        save_json(
            self.storage.as_ref(),
            &self.snapshot_key,
            &Snapshot { identity: identity.clone() },
        );
        self.update(|s| {
            s.status = SessionStatus::Authenticated;
            s.identity = Some(identity);
            s.confirmed = true;
            s.last_error = None;
            s.field_errors.clear();
            s.loading = false;
        });
    }

    /// 401 clears the session; anything else keeps the identity and records
    /// the error.
    fn settle_failure(&self, err: &AuthError) {
        if err.is_authorization_denied() {
            self.clear_local(Some(err.clone()));
            return;
        }
        self.update(|s| {
            if s.identity.is_none() {
                s.status = SessionStatus::Failed;
            }
            s.field_errors = err.field_errors().cloned().unwrap_or_default();
            s.last_error = Some(err.clone());
            s.loading = false;
        });
    }

    fn clear_local(&self, reason: Option<AuthError>) {
        self.storage.remove(&self.snapshot_key);
        self.update(|s| {
            *s = SessionState { last_error: reason, ..SessionState::default() };
        });
    }

    fn begin_form_request(&self) {
        self.update(|s| {
            s.last_error = None;
            s.field_errors.clear();
            s.loading = true;
        });
    }

    fn finish_form_request(&self, outcome: Result<serde_json::Value, AuthError>) -> Result<Option<String>, AuthError> {
        match outcome {
            Ok(body) => {
                self.update(|s| s.loading = false);
                Ok(body.get("message").and_then(serde_json::Value::as_str).map(str::to_owned))
            }
            Err(err) => {
                self.update(|s| {
                    s.field_errors = err.field_errors().cloned().unwrap_or_default();
                    s.last_error = Some(err.clone());
                    s.loading = false;
                });
                Err(err)
            }
        }
    }

    fn update(&self, mutate: impl FnOnce(&mut SessionState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            mutate(&mut state);
            state.clone()
        };
        let observers = self.observers.borrow().clone();
        for observer in observers {
            observer(&snapshot);
        }
    }
}
