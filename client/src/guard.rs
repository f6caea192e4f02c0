//! Route guard for protected screens.
//!
//! `decide` is the pure mapping from session state to a render decision.
//! `RouteGuard` adds the one-shot grace period: the first time a token is
//! present without a resolved profile, redirects are held back for a short
//! while so a session that is about to be restored does not bounce to login.

use crate::api::AuthApi;
use crate::session::{Session, SessionState};
use crate::store::TokenStore;
use std::time::{Duration, Instant};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    RenderChildren,
    RenderLoading,
    RedirectToLogin,
}

pub fn decide(state: &SessionState, token_present: bool, within_grace: bool) -> GuardDecision {
    match state {
        SessionState::Authenticated(_) | SessionState::OptimisticallyAuthenticated(_) => {
            GuardDecision::RenderChildren
        }
        SessionState::Unknown | SessionState::Verifying => GuardDecision::RenderLoading,
        SessionState::Unauthenticated if token_present && within_grace => {
            GuardDecision::RenderLoading
        }
        SessionState::Unauthenticated => GuardDecision::RedirectToLogin,
    }
}

#[derive(Debug, Clone)]
pub struct RouteGuard {
    grace: Duration,
    /// Set on the first evaluation that sees a token without a profile.
    grace_started: Option<Instant>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(DEFAULT_GRACE_PERIOD)
    }
}

impl RouteGuard {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            grace_started: None,
        }
    }

    pub fn evaluate<S: TokenStore, A: AuthApi>(&mut self, session: &Session<S, A>) -> GuardDecision {
        self.evaluate_at(session.state(), session.has_token(), Instant::now())
    }

    pub fn evaluate_at(
        &mut self,
        state: &SessionState,
        token_present: bool,
        now: Instant,
    ) -> GuardDecision {
        let within_grace = self.within_grace(state, token_present, now);
        decide(state, token_present, within_grace)
    }

    fn within_grace(&mut self, state: &SessionState, token_present: bool, now: Instant) -> bool {
        if !token_present || state.profile().is_some() {
            return false;
        }

        // Never re-armed once started.
        let started = *self.grace_started.get_or_insert(now);
        now.saturating_duration_since(started) < self.grace
    }
}
