//! Session bootstrap state machine.
//!
//! On start the session trusts whatever snapshot is stored: a cached profile
//! renders immediately as optimistically authenticated while `/auth/me`
//! confirms it in the background. Only an explicit 401/403 clears the
//! snapshot; network failures and other statuses leave the state alone.
//!
//! Every start, login, register and logout bumps a generation counter. A
//! verification ticket carries the generation it was issued under, and a
//! result that arrives after the generation moved on is dropped.

use crate::api::AuthApi;
use crate::errors::{ApiError, ClientError};
use crate::models::{LoginRequest, RegisterRequest, UserProfile};
use crate::store::{
    TOKEN_KEY, TokenStore, clear_snapshot, load_snapshot, persist_profile, persist_snapshot,
};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Storage has not been read yet.
    Unknown,
    Unauthenticated,
    /// A token is stored but there is no profile to show yet.
    Verifying,
    /// Showing the cached profile while verification is outstanding.
    OptimisticallyAuthenticated(UserProfile),
    Authenticated(UserProfile),
}

impl SessionState {
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            SessionState::OptimisticallyAuthenticated(user) | SessionState::Authenticated(user) => {
                Some(user)
            }
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile().is_some()
    }

    fn name(&self) -> &'static str {
        match self {
            SessionState::Unknown => "unknown",
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Verifying => "verifying",
            SessionState::OptimisticallyAuthenticated(_) => "optimistically-authenticated",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}

/// A pending `/auth/me` check for the token stored when the ticket was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationTicket {
    generation: u64,
    token: String,
}

impl VerificationTicket {
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Runs the check against `api`. Callers that verify concurrently with
    /// other work hand the result back through `Session::reconcile`.
    pub async fn run<A: AuthApi + ?Sized>(&self, api: &A) -> Result<UserProfile, ApiError> {
        api.me(&self.token).await
    }
}

/// Client session context. Owns its token store and API client.
pub struct Session<S: TokenStore, A: AuthApi> {
    store: S,
    api: A,
    state: SessionState,
    generation: u64,
}

impl<S: TokenStore, A: AuthApi> Session<S, A> {
    pub fn new(store: S, api: A) -> Self {
        Self {
            store,
            api,
            state: SessionState::Unknown,
            generation: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.profile()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Whether a token is stored. Unreadable storage counts as no token.
    pub fn has_token(&self) -> bool {
        match self.store.get(TOKEN_KEY) {
            Ok(token) => token.is_some_and(|token| !token.is_empty()),
            Err(e) => {
                warn!("Could not read session token: {}", e);
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Reads the stored snapshot and picks the initial state. Returns a ticket
    /// when a token is present and needs verifying; makes no network call.
    pub fn start(&mut self) -> Result<Option<VerificationTicket>, ClientError> {
        self.generation += 1;
        let snapshot = load_snapshot(&self.store)?;

        let Some(token) = snapshot.token else {
            self.transition(SessionState::Unauthenticated);
            return Ok(None);
        };

        match snapshot.user {
            Some(user) => self.transition(SessionState::OptimisticallyAuthenticated(user)),
            None => self.transition(SessionState::Verifying),
        }

        Ok(Some(VerificationTicket {
            generation: self.generation,
            token,
        }))
    }

    pub async fn verify(&self, ticket: &VerificationTicket) -> Result<UserProfile, ApiError> {
        ticket.run(&self.api).await
    }

    /// Applies a verification result.
    ///
    /// Success stores the fresh profile and authenticates. A 401/403 clears
    /// the snapshot. Anything else is logged and changes nothing.
    pub fn reconcile(
        &mut self,
        ticket: VerificationTicket,
        outcome: Result<UserProfile, ApiError>,
    ) -> Result<(), ClientError> {
        if ticket.generation != self.generation {
            debug!(
                "Dropping verification result from generation {} (current {})",
                ticket.generation, self.generation
            );
            return Ok(());
        }

        match outcome {
            Ok(user) => {
                let persisted = persist_profile(&mut self.store, &user);
                self.transition(SessionState::Authenticated(user));
                persisted?;
            }
            Err(error) if error.is_auth_rejection() => {
                info!("Stored session rejected by server: {}", error);
                let cleared = clear_snapshot(&mut self.store);
                self.transition(SessionState::Unauthenticated);
                cleared?;
            }
            Err(error) => {
                warn!(
                    "Session verification failed, keeping {} state: {}",
                    self.state.name(),
                    error
                );
            }
        }

        Ok(())
    }

    /// `start`, then verify and reconcile in place.
    pub async fn bootstrap(&mut self) -> Result<&SessionState, ClientError> {
        if let Some(ticket) = self.start()? {
            let outcome = self.verify(&ticket).await;
            self.reconcile(ticket, outcome)?;
        }
        Ok(&self.state)
    }

    /// On failure neither the state nor the stored snapshot changes.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;
        self.establish(&response.token, response.user.clone())?;
        Ok(response.user)
    }

    pub async fn register(&mut self, request: RegisterRequest) -> Result<UserProfile, ClientError> {
        let response = self.api.register(&request).await?;
        self.establish(&response.token, response.user.clone())?;
        Ok(response.user)
    }

    /// Tells the server (best effort), then forgets the session. Safe to call
    /// repeatedly; the server is only contacted while a token is stored.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        self.generation += 1;

        let token = match self.store.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!("Could not read session token before logout: {}", e);
                None
            }
        };
        if let Some(token) = token.as_deref() {
            if let Err(e) = self.api.logout(Some(token)).await {
                warn!("Logout request failed: {}", e);
            }
        }

        let cleared = clear_snapshot(&mut self.store);
        self.transition(SessionState::Unauthenticated);
        cleared?;
        Ok(())
    }

    /// Replaces the profile of an authenticated session, in memory and in storage.
    pub fn update_profile(&mut self, user: UserProfile) -> Result<(), ClientError> {
        let next = match &self.state {
            SessionState::Authenticated(_) => SessionState::Authenticated(user.clone()),
            SessionState::OptimisticallyAuthenticated(_) => {
                SessionState::OptimisticallyAuthenticated(user.clone())
            }
            _ => return Err(ClientError::NotAuthenticated),
        };

        persist_profile(&mut self.store, &user)?;
        self.transition(next);
        Ok(())
    }

    fn establish(&mut self, token: &str, user: UserProfile) -> Result<(), ClientError> {
        self.generation += 1;
        persist_snapshot(&mut self.store, token, &user)?;
        self.transition(SessionState::Authenticated(user));
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.name() != next.name() {
            debug!("Session {} -> {}", self.state.name(), next.name());
        }
        self.state = next;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::AuthResponse;
    use crate::store::tests::profile;
    use crate::store::{MemoryTokenStore, USER_KEY, load_snapshot};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// `AuthApi` that replays scripted results and records every call.
    #[derive(Default)]
    pub(crate) struct ScriptedApi {
        me: Mutex<VecDeque<Result<UserProfile, ApiError>>>,
        login: Mutex<VecDeque<Result<AuthResponse, ApiError>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedApi {
        pub(crate) fn me_returns(self, result: Result<UserProfile, ApiError>) -> Self {
            self.me.lock().unwrap().push_back(result);
            self
        }

        pub(crate) fn login_returns(self, result: Result<AuthResponse, ApiError>) -> Self {
            self.login.lock().unwrap().push_back(result);
            self
        }

        pub(crate) fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl AuthApi for ScriptedApi {
        async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
            self.record(format!("register {}", request.email));
            self.login
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("unscripted".into())))
        }

        async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
            self.record(format!("login {}", request.email));
            self.login
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("unscripted".into())))
        }

        async fn me(&self, token: &str) -> Result<UserProfile, ApiError> {
            self.record(format!("me {token}"));
            self.me
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("unscripted".into())))
        }

        async fn logout(&self, token: Option<&str>) -> Result<(), ApiError> {
            self.record(format!("logout {}", token.unwrap_or("-")));
            Ok(())
        }
    }

    fn status(status: u16) -> ApiError {
        ApiError::Status {
            status,
            message: "scripted".to_string(),
        }
    }

    fn stored(token: &str, user: Option<UserProfile>) -> MemoryTokenStore {
        let mut store = MemoryTokenStore::new();
        store.set(TOKEN_KEY, token).unwrap();
        if let Some(user) = user {
            persist_profile(&mut store, &user).unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_no_token_means_unauthenticated_without_network() {
        let mut session = Session::new(MemoryTokenStore::new(), ScriptedApi::default());

        let state = session.bootstrap().await.unwrap().clone();

        assert_eq!(state, SessionState::Unauthenticated);
        assert!(session.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_cached_profile_is_optimistic_until_verified() {
        let cached = profile("u1");
        let mut fresh = profile("u1");
        fresh.first_name = Some("Renamed".to_string());

        let api = ScriptedApi::default().me_returns(Ok(fresh.clone()));
        let mut session = Session::new(stored("tok", Some(cached.clone())), api);

        let ticket = session.start().unwrap().unwrap();
        assert_eq!(
            session.state(),
            &SessionState::OptimisticallyAuthenticated(cached)
        );
        assert!(session.is_authenticated());

        let outcome = session.verify(&ticket).await;
        session.reconcile(ticket, outcome).unwrap();

        assert_eq!(session.state(), &SessionState::Authenticated(fresh.clone()));
        assert_eq!(load_snapshot(session.store()).unwrap().user, Some(fresh));
        assert_eq!(session.api().calls(), vec!["me tok".to_string()]);
    }

    #[tokio::test]
    async fn test_token_without_profile_is_verifying() {
        let api = ScriptedApi::default().me_returns(Ok(profile("u1")));
        let mut session = Session::new(stored("tok", None), api);

        session.start().unwrap();
        assert_eq!(session.state(), &SessionState::Verifying);
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_server_error_keeps_session() {
        let cached = profile("u1");
        let api = ScriptedApi::default().me_returns(Err(status(500)));
        let mut session = Session::new(stored("tok", Some(cached.clone())), api);

        session.bootstrap().await.unwrap();

        assert_eq!(
            session.state(),
            &SessionState::OptimisticallyAuthenticated(cached.clone())
        );
        let snapshot = load_snapshot(session.store()).unwrap();
        assert_eq!(snapshot.token.as_deref(), Some("tok"));
        assert_eq!(snapshot.user, Some(cached));
    }

    #[tokio::test]
    async fn test_network_failure_while_verifying_stays_verifying() {
        let api = ScriptedApi::default().me_returns(Err(ApiError::Network("offline".into())));
        let mut session = Session::new(stored("tok", None), api);

        session.bootstrap().await.unwrap();

        assert_eq!(session.state(), &SessionState::Verifying);
        assert!(session.has_token());
    }

    #[tokio::test]
    async fn test_auth_rejection_clears_snapshot() {
        for code in [401, 403] {
            let api = ScriptedApi::default().me_returns(Err(status(code)));
            let mut session = Session::new(stored("tok", Some(profile("u1"))), api);

            session.bootstrap().await.unwrap();

            assert_eq!(session.state(), &SessionState::Unauthenticated);
            assert!(!session.has_token());
            assert!(session.store().get(USER_KEY).unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_stale_verification_result_is_discarded() {
        let fresh = profile("u2");
        let api = ScriptedApi::default().login_returns(Ok(AuthResponse {
            user: fresh.clone(),
            token: "new-token".to_string(),
        }));
        let mut session = Session::new(stored("old-token", Some(profile("u1"))), api);

        let ticket = session.start().unwrap().unwrap();
        session.login("u2@example.com", "secret1").await.unwrap();

        // The old token's rejection arrives after the new login.
        session.reconcile(ticket, Err(status(403))).unwrap();

        assert_eq!(session.state(), &SessionState::Authenticated(fresh));
        let snapshot = load_snapshot(session.store()).unwrap();
        assert_eq!(snapshot.token.as_deref(), Some("new-token"));
    }

    #[tokio::test]
    async fn test_failed_login_changes_nothing() {
        let api = ScriptedApi::default().login_returns(Err(status(401)));
        let mut session = Session::new(MemoryTokenStore::new(), api);
        session.start().unwrap();

        let result = session.login("a@example.com", "wrong").await;

        assert!(matches!(result, Err(ClientError::Api(_))));
        assert_eq!(session.state(), &SessionState::Unauthenticated);
        assert!(!session.has_token());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let mut session = Session::new(stored("tok", Some(profile("u1"))), ScriptedApi::default());
        session.start().unwrap();

        session.logout().await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(session.state(), &SessionState::Unauthenticated);
        assert!(!session.has_token());
        assert_eq!(session.api().calls(), vec!["logout tok".to_string()]);
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let mut session = Session::new(MemoryTokenStore::new(), ScriptedApi::default());
        session.start().unwrap();
        assert!(matches!(
            session.update_profile(profile("u1")),
            Err(ClientError::NotAuthenticated)
        ));

        let mut session = Session::new(stored("tok", Some(profile("u1"))), ScriptedApi::default());
        session.start().unwrap();
        let mut renamed = profile("u1");
        renamed.last_name = Some("Kapanadze".to_string());
        session.update_profile(renamed.clone()).unwrap();

        assert_eq!(session.user(), Some(&renamed));
        assert_eq!(load_snapshot(session.store()).unwrap().user, Some(renamed));
    }
}
