//! Route guard: every transition is checked against the session before the
//! target page is rendered.
//!
//! DECISION PROCEDURE
//! ==================
//! 1. Public target (sign-in, sign-up, forgot-password) with a confirmed
//!    session: redirect to the landing route.
//! 2. Protected target without a confirmed session: ask the server once
//!    (`fetch_user`) unless the user is coming from a public page, where a
//!    failed sign-in would otherwise trigger a pointless round trip. Still
//!    unconfirmed afterwards: redirect to sign-in.
//! 3. Everything else is allowed.
//!
//! A session that ends while a protected page is showing (sign-out, or a 401
//! from any request) is handled by [`NavigationGuard::evict`]; the page is
//! replaced by sign-in without waiting for the next navigation.
//!
//! The guard never fails. Session errors are logged and count as "not
//! signed in".

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::rc::Rc;

use super::RouteName;
use super::progress::ProgressIndicator;
use crate::state::session::{SessionState, SessionStore};

/// Which routes are public and where redirects go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardConfig {
    pub public_routes: Vec<RouteName>,
    /// Where unauthenticated users are sent.
    pub sign_in: RouteName,
    /// Where authenticated users land when they open a public page.
    pub landing: RouteName,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            public_routes: vec![RouteName::SignIn, RouteName::SignUp, RouteName::ForgotPassword],
            sign_in: RouteName::SignIn,
            landing: RouteName::Dashboard,
        }
    }
}

/// One end of a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// `None` for paths outside the route table.
    pub name: Option<RouteName>,
    pub path: String,
}

impl Location {
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        Self { name: RouteName::from_path(path), path: path.to_owned() }
    }

    #[must_use]
    pub fn named(route: RouteName) -> Self {
        Self { name: Some(route), path: route.path().to_owned() }
    }
}

/// Outcome of a guarded transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(RouteName),
}

/// Gates route transitions on the session and drives the progress indicator.
pub struct NavigationGuard {
    session: Rc<SessionStore>,
    progress: Rc<dyn ProgressIndicator>,
    config: GuardConfig,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(session: Rc<SessionStore>, progress: Rc<dyn ProgressIndicator>, config: GuardConfig) -> Self {
        Self { session, progress, config }
    }

    /// Whether `location` is reachable without a session. Paths outside the
    /// route table are protected.
    #[must_use]
    pub fn is_public(&self, location: &Location) -> bool {
        location
            .name
            .is_some_and(|name| self.config.public_routes.contains(&name))
    }

    /// Run a full transition: progress on, decide, progress off.
    pub async fn transition(&self, to: &Location, from: Option<&Location>) -> Decision {
        let named = to.name.is_some();
        if named {
            self.progress.start();
        }
        let decision = self.decide(to, from).await;
        if named {
            self.progress.done();
        }
        decision
    }

    /// The authorization decision alone.
    pub async fn decide(&self, to: &Location, from: Option<&Location>) -> Decision {
        let public = self.is_public(to);

        if public && self.session.is_confirmed() {
            return Decision::Redirect(self.config.landing);
        }

        if !public && !self.session.is_confirmed() {
            let retrying_from_public = from.is_some_and(|f| self.is_public(f));
            if !retrying_from_public {
                if let Err(err) = self.session.fetch_user().await {
                    leptos::logging::warn!("session check for {} failed: {err}", to.path);
                }
            }
            if !self.session.is_confirmed() {
                return Decision::Redirect(self.config.sign_in);
            }
        }

        Decision::Allow
    }

    /// Where to send the user when the session changes under a page already
    /// on screen. Only a confirmed session that has just ended evicts, and
    /// public pages are left alone.
    #[must_use]
    pub fn evict(&self, was_confirmed: bool, state: &SessionState, at: &Location) -> Option<RouteName> {
        let ended = was_confirmed && !state.is_authenticated();
        (ended && !self.is_public(at)).then_some(self.config.sign_in)
    }
}
