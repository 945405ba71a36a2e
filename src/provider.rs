use snafu::Snafu;
use url::Url;

use crate::response::{AuthPayload, AuthorizationErrorResponse};

/// An error reported by the identity provider or by the transport carrying its
/// responses. Passed through to callers verbatim, wrapped only by
/// [`crate::SessionError::Provider`].
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ProviderError {
    #[snafu(display("ProviderError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("ProviderError: Provider returned an error response"))]
    Authorization { response: AuthorizationErrorResponse },

    #[snafu(display("ProviderError: Silent check answered {status} instead of a redirect"))]
    NoRedirect { status: reqwest::StatusCode },

    #[snafu(display("ProviderError: Silent check redirect carries no usable location"))]
    Location { source: url::ParseError },

    #[snafu(display("ProviderError: Silent check response does not echo this client's state"))]
    StateMismatch,

    #[snafu(display("ProviderError: Renewed id token does not carry this client's nonce"))]
    NonceMismatch,

    #[snafu(display("ProviderError: Remote logout failed with status {status}"))]
    RemoteLogout { status: reqwest::StatusCode },
}

/// The identity provider's client interface, as consumed by
/// [`crate::SessionManager`] (its sole caller).
///
/// The production implementation is [`crate::RedirectClient`]; tests substitute
/// scripted implementations.
#[allow(async_fn_in_trait)]
pub trait ProviderClient {
    /// Triggers a full-page redirect to the provider's authorization endpoint.
    /// Fire-and-forget: the current page is navigated away, nothing is
    /// reported back.
    fn authorize(&self);

    /// Parses the redirect payload the provider left in the current URL
    /// fragment. Meant to run once per redirect.
    async fn parse_callback(&self) -> Result<AuthPayload, ProviderError>;

    /// Performs a silent (`prompt=none`) session check against the provider,
    /// without visible navigation.
    async fn check_session(&self) -> Result<AuthPayload, ProviderError>;

    /// Terminates the provider-side session, sending the configured
    /// post-logout redirect target along.
    async fn end_session(&self) -> Result<(), ProviderError>;
}

/// The navigation surface of the embedding page.
///
/// The implicit flow lives off the user agent: logins navigate it to the
/// provider, and completed logins come back encoded in its URL fragment. The
/// embedding shell injects whatever it has (a browser window, a webview, a
/// test double) instead of this library reaching for an ambient one.
pub trait UserAgent {
    /// The URL currently shown, including the fragment.
    fn current_url(&self) -> Url;

    /// Navigates the page away. Anything scheduled after this call may never
    /// run in a real browser.
    fn navigate_to(&self, url: Url);
}
