//! Client-side session layer for the PropDash API.
//!
//! A `Session` owns the persisted token snapshot and the API client, and moves
//! through the bootstrap state machine. `RouteGuard` turns the session state
//! into a render decision for protected screens.

pub mod api;
pub mod config;
pub mod errors;
pub mod guard;
pub mod models;
pub mod session;
pub mod store;

pub use api::{AuthApi, HttpAuthApi};
pub use config::ClientConfig;
pub use errors::{ApiError, ClientError, StoreError};
pub use guard::{GuardDecision, RouteGuard, decide};
pub use models::UserProfile;
pub use session::{Session, SessionState, VerificationTicket};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Opens a session backed by the session file and the HTTP API named in `config`.
pub fn open_session(config: &ClientConfig) -> Result<Session<FileTokenStore, HttpAuthApi>, ClientError> {
    let api = HttpAuthApi::new(&config.api_base_url)?;
    let store = FileTokenStore::new(&config.session_file);
    Ok(Session::new(store, api))
}
