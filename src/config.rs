use url::Url;

/// The default scope requested from the identity provider when the embedding
/// application does not override it.
pub const DEFAULT_SCOPE: &str = "openid profile email";

/// Represents the parameters required for initializing a [`crate::SessionManager`].
/// These include the identity provider's base URL, client ID, and the redirect
/// targets registered with the provider.
///
/// All values are supplied by the embedding application (typically sourced from
/// environment variables at bootstrap) and are forwarded to the provider as-is.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Base URL of your identity provider tenant, e.g. "https://example.eu.auth0.com/".
    pub provider_base_url: Url,

    /// The API identifier ("audience") for which access tokens are requested.
    pub audience: String,

    /// The name of this client as configured inside your provider's admin area.
    pub client_id: String,

    /// Url to which you want to be redirected after a successful login.
    /// Must be registered with the provider as an allowed callback URL.
    pub post_login_redirect_url: Url,

    /// Url to which you want to be redirected after a successful logout.
    pub post_logout_redirect_url: Url,

    /// Space-separated OIDC scopes. See [`DEFAULT_SCOPE`].
    pub scope: String,
}
