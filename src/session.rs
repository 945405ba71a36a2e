use snafu::ResultExt;

use crate::client::RedirectClient;
use crate::config::SessionOptions;
use crate::error::{MissingTokenSnafu, ProviderSnafu, SessionError};
use crate::provider::{ProviderClient, ProviderError, UserAgent};
use crate::response::AuthPayload;
use crate::token::Credential;

/// Continuation invoked after the provider confirmed a remote logout.
pub type OnLogout = Box<dyn FnOnce() + Send>;

/// Single source of truth for the current credential, and the sole caller of
/// the identity provider's client.
///
/// One instance lives for the whole application; wrap it in a
/// [`crate::SessionContext`] to share it with the view layer. The credential
/// is held in memory only and starts out empty; a successful callback or
/// renewal populates it, logout (or a failed renewal) empties it again.
/// Passing the expiry instant does not clear anything by itself, staleness is
/// observed on the next query.
pub struct SessionManager<C> {
    client: C,
    credential: Credential,
}

impl<U: UserAgent> SessionManager<RedirectClient<U>> {
    /// Constructs a manager backed by the production [`RedirectClient`].
    /// Fails if the provider client cannot be constructed from `options`;
    /// that failure is fatal and left to the caller.
    pub fn new(options: SessionOptions, user_agent: U) -> Result<Self, SessionError> {
        Ok(Self::with_client(RedirectClient::new(options, user_agent)?))
    }
}

impl<C: ProviderClient> SessionManager<C> {
    /// Constructs a manager over an arbitrary provider client implementation.
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            credential: Credential::default(),
        }
    }

    /// Triggers the full-page redirect to the provider's login page.
    /// Fire-and-forget: this is a terminal action for the current page, there
    /// is nothing to await or to fail.
    pub fn login(&self) {
        tracing::debug!("Starting login redirect");
        self.client.authorize();
    }

    /// Completes a login by parsing the provider's redirect payload out of the
    /// current URL. Meant to be called exactly once per page load of the
    /// callback page.
    ///
    /// On success the credential is replaced atomically and the full raw
    /// payload is returned. A provider error, or a payload lacking either
    /// token, rejects with the credential exactly as it was before the call.
    pub async fn handle_authentication(&mut self) -> Result<AuthPayload, SessionError> {
        tracing::debug!("Received auth callback");

        let result = self.client.parse_callback().await;
        match self.complete(result) {
            Ok(payload) => {
                tracing::debug!("Logged in successfully");
                Ok(payload)
            }
            Err(err) => {
                tracing::error!(?err, "Error logging in");
                Err(err)
            }
        }
    }

    /// Checks the provider for a still-live session without visible
    /// navigation and, on success, replaces the credential just like
    /// [`SessionManager::handle_authentication`].
    ///
    /// On failure the error is returned AND [`SessionManager::logout`] runs
    /// once, so a failed renewal never leaves a half-valid session behind.
    /// There is no retry; callers re-invoke if they want one.
    pub async fn renew_session(&mut self) -> Result<AuthPayload, SessionError> {
        tracing::debug!("Renewing session");

        let result = self.client.check_session().await;
        match self.complete(result) {
            Ok(payload) => {
                tracing::debug!("Renewed session successfully");
                Ok(payload)
            }
            Err(err) => {
                tracing::error!(?err, "Error renewing session");
                self.logout(None).await;
                Err(err)
            }
        }
    }

    /// Clears the local credential immediately, then asks the provider to end
    /// its session. The local clear is unconditional: even if the remote call
    /// fails, no client-visible session stays alive. Remote failures are
    /// logged and swallowed; `on_success` runs only after a confirmed remote
    /// logout.
    pub async fn logout(&mut self, on_success: Option<OnLogout>) {
        self.credential.clear();

        match self.client.end_session().await {
            Ok(()) => {
                if let Some(on_success) = on_success {
                    on_success();
                }
            }
            Err(err) => {
                tracing::error!(?err, "Error logging out");
            }
        }
    }

    /// Shared tail of callback handling and renewal: reject provider errors
    /// and token-less payloads without touching the credential, otherwise
    /// replace it from the payload.
    fn complete(
        &mut self,
        result: Result<AuthPayload, ProviderError>,
    ) -> Result<AuthPayload, SessionError> {
        let payload = result.context(ProviderSnafu {})?;

        let Some(access_token) = payload.access_token.clone() else {
            return MissingTokenSnafu {}.fail();
        };
        if payload.id_token.is_none() {
            return MissingTokenSnafu {}.fail();
        }

        self.credential.set(
            access_token,
            payload.id_token_claims.clone(),
            payload.expires_in.unwrap_or(0),
        );
        Ok(payload)
    }

    /// Whether the stored expiry instant has been reached.
    pub fn is_token_expired(&self) -> bool {
        self.credential.is_token_expired()
    }

    /// A token is held and not yet expired.
    pub fn has_valid_token(&self) -> bool {
        self.credential.has_valid_token()
    }

    /// A token is held, but it is expired. `false` when no token is held.
    pub fn has_expired_token(&self) -> bool {
        self.credential.has_expired_token()
    }

    /// Valid token plus decoded claims.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_authenticated()
    }

    /// The current access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.credential.access_token()
    }

    /// The subject identifier from the current claims, if any.
    pub fn user_id(&self) -> Option<&str> {
        self.credential.user_id()
    }

    /// The permissions list from the current claims; empty when absent.
    pub fn permissions(&self) -> &[String] {
        self.credential.permissions()
    }
}
