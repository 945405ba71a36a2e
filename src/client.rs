use snafu::ResultExt;
use url::Url;

use crate::config::SessionOptions;
use crate::error::{EndpointSnafu, HttpClientSnafu, SessionError};
use crate::provider::{
    AuthorizationSnafu, NonceMismatchSnafu, ProviderClient, ProviderError, StateMismatchSnafu,
    UserAgent,
};
use crate::request;
use crate::response::{AuthPayload, CallbackResponse};
use crate::state_token::{Nonce, StateToken};

/// The response type requested from the authorization endpoint in the implicit
/// flow: tokens are returned directly in the redirect fragment, without a
/// server-side code exchange.
const RESPONSE_TYPE: &str = "token id_token";

/// An authorization URL together with the `state` and `nonce` values baked
/// into it, kept so the provider's answer can be matched against them.
struct AuthorizationRequest {
    url: Url,
    state: StateToken,
    nonce: Nonce,
}

/// Production [`ProviderClient`] speaking the provider's redirect/callback
/// contract.
///
/// Interactive operations (login) go through the injected [`UserAgent`];
/// non-interactive ones (silent check, remote logout) go over HTTP directly.
pub struct RedirectClient<U> {
    options: SessionOptions,
    authorization_endpoint: Url,
    end_session_endpoint: Url,
    http: reqwest::Client,
    user_agent: U,
}

impl<U: UserAgent> RedirectClient<U> {
    /// Derives the provider endpoints from the configured base URL and builds
    /// the HTTP client. Either step failing is fatal and propagated; there is
    /// nothing to recover to without a provider to talk to.
    pub fn new(options: SessionOptions, user_agent: U) -> Result<Self, SessionError> {
        let authorization_endpoint = options
            .provider_base_url
            .join("authorize")
            .context(EndpointSnafu {})?;
        let end_session_endpoint = options
            .provider_base_url
            .join("v2/logout")
            .context(EndpointSnafu {})?;

        // Redirect following stays off so that silent checks can read the
        // fragment out of the Location header. See `request::silent_authentication`.
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .context(HttpClientSnafu {})?;

        Ok(Self {
            options,
            authorization_endpoint,
            end_session_endpoint,
            http,
            user_agent,
        })
    }

    /// Builds an implicit-flow authorization URL with fresh `state` and
    /// `nonce` values. `silent` adds the parameters that keep the provider
    /// from rendering any interactive page.
    fn authorization_request(&self, silent: bool) -> AuthorizationRequest {
        let state = StateToken::new();
        let nonce = Nonce::new();
        let mut url = self.authorization_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", RESPONSE_TYPE)
            .append_pair("client_id", &self.options.client_id)
            .append_pair("redirect_uri", self.options.post_login_redirect_url.as_str())
            .append_pair("scope", &self.options.scope)
            .append_pair("audience", &self.options.audience)
            .append_pair("state", state.as_str())
            .append_pair("nonce", nonce.as_str());
        if silent {
            url.query_pairs_mut()
                .append_pair("prompt", "none")
                .append_pair("response_mode", "fragment");
        }
        AuthorizationRequest { url, state, nonce }
    }

    fn logout_url(&self) -> Url {
        let mut url = self.end_session_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.options.client_id)
            .append_pair("returnTo", self.options.post_logout_redirect_url.as_str());
        url
    }

    fn into_payload(response: CallbackResponse) -> Result<AuthPayload, ProviderError> {
        match response {
            CallbackResponse::Success(payload) => Ok(payload),
            CallbackResponse::Error(response) => AuthorizationSnafu { response }.fail(),
        }
    }
}

impl<U: UserAgent> ProviderClient for RedirectClient<U> {
    fn authorize(&self) {
        // The page, and with it this client, is gone once the provider
        // redirects back, so the state sent here cannot be compared against
        // its echo without cross-reload persistence. Echo verification is
        // limited to silent checks, which complete within one page lifetime.
        self.user_agent
            .navigate_to(self.authorization_request(false).url);
    }

    async fn parse_callback(&self) -> Result<AuthPayload, ProviderError> {
        let current_url = self.user_agent.current_url();
        Self::into_payload(CallbackResponse::from_redirect_url(&current_url))
    }

    async fn check_session(&self) -> Result<AuthPayload, ProviderError> {
        let AuthorizationRequest { url, state, nonce } = self.authorization_request(true);
        let location = request::silent_authentication(&self.http, url).await?;
        let payload = Self::into_payload(CallbackResponse::from_redirect_url(&location))?;

        if !state.validate(payload.state.as_deref()) {
            return StateMismatchSnafu {}.fail();
        }
        if let Some(claims) = &payload.id_token_claims {
            if !nonce.validate(claims.nonce.as_deref()) {
                return NonceMismatchSnafu {}.fail();
            }
        }
        Ok(payload)
    }

    async fn end_session(&self) -> Result<(), ProviderError> {
        request::remote_logout(&self.http, self.logout_url()).await
    }
}
