use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::SessionError;
use crate::provider::ProviderClient;
use crate::response::AuthPayload;
use crate::session::{OnLogout, SessionManager};
use crate::{AccessToken, SubjectIdentifier};

/// Clonable, process-wide handle to the one [`SessionManager`] of the
/// application.
///
/// Create it once at bootstrap and pass clones down to whatever needs to
/// read or drive the session; there is no ambient lookup. All operations are
/// async because the manager sits behind an async mutex; the mutex also
/// serializes overlapping renewals, so the last-writer-wins behavior of a
/// bare manager cannot occur through this handle.
pub struct SessionContext<C> {
    manager: Arc<Mutex<SessionManager<C>>>,
}

impl<C> Clone for SessionContext<C> {
    fn clone(&self) -> Self {
        Self {
            manager: Arc::clone(&self.manager),
        }
    }
}

impl<C: ProviderClient> SessionContext<C> {
    pub fn new(manager: SessionManager<C>) -> Self {
        Self {
            manager: Arc::new(Mutex::new(manager)),
        }
    }

    /// The current access token, renewing lazily: a token that exists but has
    /// expired triggers exactly one renewal before the (then updated) token is
    /// returned. No token at all returns `None` without contacting the
    /// provider; renewal is never speculative.
    ///
    /// A failed renewal propagates its error (and, through the manager, has
    /// already cleared the session).
    pub async fn current_token(&self) -> Result<Option<AccessToken>, SessionError> {
        let mut manager = self.manager.lock().await;
        if manager.has_expired_token() {
            manager.renew_session().await?;
        }
        Ok(manager.access_token().map(str::to_owned))
    }

    /// The current user's subject identifier, only while the session holds a
    /// *valid* token. Deliberately stricter than [`Self::current_token`],
    /// which hands out whatever token presence allows.
    pub async fn current_user_id(&self) -> Option<SubjectIdentifier> {
        let manager = self.manager.lock().await;
        match manager.has_valid_token() {
            true => manager.user_id().map(str::to_owned),
            false => None,
        }
    }

    /// Forwards to [`SessionManager::login`].
    pub async fn login(&self) {
        self.manager.lock().await.login();
    }

    /// Forwards to [`SessionManager::logout`].
    pub async fn logout(&self, on_success: Option<OnLogout>) {
        self.manager.lock().await.logout(on_success).await;
    }

    /// Forwards to [`SessionManager::handle_authentication`].
    pub async fn handle_auth_callback(&self) -> Result<AuthPayload, SessionError> {
        self.manager.lock().await.handle_authentication().await
    }

    /// Whether the session currently counts as authenticated (valid token and
    /// decoded claims). Convenience read for UI gating.
    pub async fn is_authenticated(&self) -> bool {
        self.manager.lock().await.is_authenticated()
    }
}
