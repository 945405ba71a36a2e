//! In-memory session management for single-page applications that delegate
//! authentication to an OAuth2/OIDC identity provider via the redirect-based
//! implicit flow.
//!
//! The embedding shell constructs one [`SessionManager`] at bootstrap, wraps
//! it in a [`SessionContext`] and hands clones of that context to its views.
//! The session lives in memory only: a page reload starts logged out, and a
//! silent renewal (or a fresh login) brings the session back.
//!
//! ```no_run
//! use oidc_session::{
//!     DEFAULT_SCOPE, SessionContext, SessionManager, SessionOptions, UserAgent, url::Url,
//! };
//!
//! // The navigation surface of the embedding page. A browser shell would
//! // back this with `window.location`.
//! struct Browser;
//!
//! impl UserAgent for Browser {
//!     fn current_url(&self) -> Url {
//!         unimplemented!()
//!     }
//!     fn navigate_to(&self, _url: Url) {
//!         unimplemented!()
//!     }
//! }
//!
//! # async fn bootstrap() -> Result<(), oidc_session::SessionError> {
//! let manager = SessionManager::new(
//!     SessionOptions {
//!         provider_base_url: Url::parse("https://example.eu.auth0.com/").unwrap(),
//!         audience: "https://api.example.com".to_owned(),
//!         client_id: "my-client-id".to_owned(),
//!         post_login_redirect_url: Url::parse("https://app.example.com/callback").unwrap(),
//!         post_logout_redirect_url: Url::parse("https://app.example.com/").unwrap(),
//!         scope: DEFAULT_SCOPE.to_owned(),
//!     },
//!     Browser,
//! )?;
//! let session = SessionContext::new(manager);
//!
//! // On the callback page, once per page load:
//! let _payload = session.handle_auth_callback().await?;
//!
//! // Anywhere else, e.g. before an API call:
//! if let Some(_token) = session.current_token().await? {
//!     // attach `token` as a bearer credential
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod context;
mod error;
mod provider;
mod request;
mod response;
mod session;
mod state_token;
mod token;
mod token_claims;

// Library exports (additional to pub modules).
pub use client::RedirectClient;
pub use config::{DEFAULT_SCOPE, SessionOptions};
pub use context::SessionContext;
pub use error::SessionError;
pub use provider::{ProviderClient, ProviderError, UserAgent};
pub use response::{AuthErrorCode, AuthPayload, AuthorizationErrorResponse, KnownAuthErrorCode};
pub use session::{OnLogout, SessionManager};
pub use state_token::{Nonce, StateToken};
pub use token_claims::IdTokenClaims;
pub mod url {
    pub use url::Url;
}

/// Bearer credential for downstream API calls, opaque to this library.
pub type AccessToken = String;
/// A JWT-shaped id token, verbatim as received.
pub type IdToken = String;
/// The `sub` claim: a locally unique, never reassigned user identifier.
pub type SubjectIdentifier = String;
