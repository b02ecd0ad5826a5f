//! Authentication state of the client
//!
//! A [`Session`] is built once at startup and handed to whatever needs to
//! know whether the user is logged in. It is the only writer of the token
//! and remember-me entries in the store.

use crate::error::{CoreError, CoreResult};
use crate::storage::KeyValueStore;

pub const TOKEN_KEY: &str = "token";
pub const REMEMBER_ME_KEY: &str = "rememberMe";

/// Snapshot of the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub authenticated: bool,
    pub remember_me: bool,
}

pub struct Session<S: KeyValueStore> {
    store: S,
    token: Option<String>,
    state: SessionState,
}

impl<S: KeyValueStore> Session<S> {
    /// Rebuild the session from the store.
    ///
    /// A stored token is honoured only when remember-me is set; otherwise it
    /// is discarded and the session starts logged out. Unreadable entries are
    /// logged and treated as absent.
    pub async fn restore(store: S) -> Self {
        let remember_me = match store.get(REMEMBER_ME_KEY).await {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                log::warn!("could not read remember-me flag: {}", e);
                false
            }
        };

        let stored_token = match store.get(TOKEN_KEY).await {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("could not read session token: {}", e);
                None
            }
        };

        let token = match stored_token {
            Some(token) if remember_me => Some(token),
            Some(_) => {
                log::info!("discarding stored token: remember-me is off");
                if let Err(e) = store.remove(TOKEN_KEY).await {
                    log::warn!("could not delete session token: {}", e);
                }
                None
            }
            None => None,
        };

        let state = SessionState {
            authenticated: token.is_some(),
            remember_me,
        };
        log::debug!("session restored: {:?}", state);

        Self { store, token, state }
    }

    /// Record a successful login or registration
    pub async fn begin(&mut self, token: String, remember_me: bool) -> CoreResult<()> {
        self.store.set(TOKEN_KEY, &token).await?;
        self.store
            .set(REMEMBER_ME_KEY, if remember_me { "true" } else { "false" })
            .await?;

        self.token = Some(token);
        self.state = SessionState {
            authenticated: true,
            remember_me,
        };
        log::info!("session started (remember me: {})", remember_me);
        Ok(())
    }

    /// Log out: forget the token and the remember-me preference
    pub async fn end(&mut self) -> CoreResult<()> {
        self.token = None;
        self.state = SessionState::default();
        self.store.remove(TOKEN_KEY).await?;
        self.store.set(REMEMBER_ME_KEY, "false").await?;
        log::info!("session ended");
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token of the active session, or `Unauthorized`
    pub fn require_token(&self) -> CoreResult<&str> {
        self.token.as_deref().ok_or(CoreError::Unauthorized)
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.authenticated
    }

    pub fn remember_me(&self) -> bool {
        self.state.remember_me
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
