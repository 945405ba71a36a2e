use serde::{Deserialize, Serialize};
use url::Url;

use crate::token_claims::{IdTokenClaims, decode_id_token_payload};
use crate::{AccessToken, IdToken};

/// The raw result of a completed authorization round trip, as delivered in the
/// provider's redirect fragment (or in the `Location` fragment of a silent
/// check).
///
/// Tokens are optional because the fragment is entirely under the provider's
/// control; [`crate::SessionManager::handle_authentication`] rejects payloads
/// lacking either token before any credential state is touched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct AuthPayload {
    /// Bearer credential for downstream API calls.
    pub access_token: Option<AccessToken>,

    /// The id token, verbatim.
    pub id_token: Option<IdToken>,

    /// The decoded payload segment of `id_token`, if it could be decoded.
    pub id_token_claims: Option<IdTokenClaims>,

    /// Lifetime of `access_token` in seconds, from the moment the payload was
    /// received.
    pub expires_in: Option<i64>,

    /// Echo of the `state` value sent with the authorization request.
    pub state: Option<String>,

    /// Token type as reported by the provider, usually `Bearer`.
    pub token_type: Option<String>,
}

/// An enumeration representing the two shapes an authorization redirect
/// fragment can take.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CallbackResponse {
    Success(AuthPayload),
    Error(AuthorizationErrorResponse),
}

impl CallbackResponse {
    /// Parses the fragment of a redirect URL. The implicit flow encodes the
    /// result as `application/x-www-form-urlencoded` pairs in the fragment,
    /// e.g. `#access_token=...&id_token=...&expires_in=7200`.
    ///
    /// A URL without a fragment yields an empty (token-less) success payload;
    /// distinguishing that from a genuine provider error is left to the
    /// caller, which treats both as a failed login.
    pub(crate) fn from_redirect_url(url: &Url) -> Self {
        let fragment = url.fragment().unwrap_or_default();
        let mut payload = AuthPayload::default();
        let mut error: Option<String> = None;
        let mut error_description: Option<String> = None;
        let mut error_uri: Option<String> = None;

        for (key, value) in url::form_urlencoded::parse(fragment.as_bytes()) {
            match key.as_ref() {
                "access_token" => payload.access_token = Some(value.into_owned()),
                "id_token" => payload.id_token = Some(value.into_owned()),
                "expires_in" => payload.expires_in = value.parse().ok(),
                "state" => payload.state = Some(value.into_owned()),
                "token_type" => payload.token_type = Some(value.into_owned()),
                "error" => error = Some(value.into_owned()),
                "error_description" => error_description = Some(value.into_owned()),
                "error_uri" => error_uri = Some(value.into_owned()),
                other => {
                    tracing::trace!(key = other, "Ignoring unknown fragment parameter");
                }
            }
        }

        if let Some(error) = error {
            return Self::Error(AuthorizationErrorResponse {
                error: AuthErrorCode::from_str(&error),
                error_description,
                error_uri,
            });
        }

        payload.id_token_claims = payload
            .id_token
            .as_deref()
            .and_then(decode_id_token_payload);
        Self::Success(payload)
    }
}

/// Error codes an authorization endpoint may return in the redirect fragment.
///
/// See [RFC 6749 Section 4.2.2.1](https://datatracker.ietf.org/doc/html/rfc6749#section-4.2.2.1)
/// and [OIDC Core Section 3.1.2.6](https://openid.net/specs/openid-connect-core-1_0.html#AuthError)
/// for details.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum KnownAuthErrorCode {
    /// The request is missing a required parameter, includes an invalid
    /// parameter value, includes a parameter more than once, or is otherwise
    /// malformed.
    #[serde(rename = "invalid_request")]
    InvalidRequest,

    /// The client is not authorized to request an access token using this
    /// method.
    #[serde(rename = "unauthorized_client")]
    UnauthorizedClient,

    /// The resource owner or authorization server denied the request.
    #[serde(rename = "access_denied")]
    AccessDenied,

    /// The authorization server does not support obtaining an access token
    /// using this method.
    #[serde(rename = "unsupported_response_type")]
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    #[serde(rename = "invalid_scope")]
    InvalidScope,

    /// The authorization server encountered an unexpected condition that
    /// prevented it from fulfilling the request.
    #[serde(rename = "server_error")]
    ServerError,

    /// The authorization server is currently unable to handle the request due
    /// to a temporary overloading or maintenance of the server.
    #[serde(rename = "temporarily_unavailable")]
    TemporarilyUnavailable,

    /// OIDC. The Authorization Server requires End-User authentication. This
    /// is what a `prompt=none` silent check returns when the provider holds no
    /// live session for the user.
    #[serde(rename = "login_required")]
    LoginRequired,

    /// OIDC. The Authorization Server requires End-User interaction of some
    /// form to proceed, but the request indicated that no interaction should
    /// be performed.
    #[serde(rename = "interaction_required")]
    InteractionRequired,

    /// OIDC. The Authorization Server requires End-User consent, but the
    /// request indicated that no consent screen should be displayed.
    #[serde(rename = "consent_required")]
    ConsentRequired,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AuthErrorCode {
    Known(KnownAuthErrorCode),
    Unknown(String),
}

impl AuthErrorCode {
    fn from_str(code: &str) -> Self {
        // Round-tripping through serde keeps the rename attributes the single
        // source of truth for the known code spellings.
        serde_json::from_value(serde_json::Value::String(code.to_owned()))
            .unwrap_or_else(|_| Self::Unknown(code.to_owned()))
    }
}

/// OAuth/OIDC error response received from the identity provider's
/// authorization endpoint, transported in the redirect fragment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorizationErrorResponse {
    /// The error code (e.g., `access_denied` or `login_required`).
    pub error: AuthErrorCode,

    /// OPTIONAL. Human-readable ASCII text providing additional information,
    /// used to assist the client developer in understanding the error that
    /// occurred.
    pub error_description: Option<String>,

    /// OPTIONAL. A URI identifying a human-readable web page with information
    /// about the error.
    pub error_uri: Option<String>,
}

impl AuthorizationErrorResponse {
    /// Check if this error means the provider holds no usable session for the
    /// user anymore. Any of the OIDC `*_required` codes on a silent check
    /// implies a fresh interactive login is needed.
    pub fn requires_interactive_login(&self) -> bool {
        matches!(
            self.error,
            AuthErrorCode::Known(
                KnownAuthErrorCode::LoginRequired
                    | KnownAuthErrorCode::InteractionRequired
                    | KnownAuthErrorCode::ConsentRequired
            )
        )
    }

    /// Check if this error is on the provider's side and a later retry might
    /// succeed without user involvement.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.error,
            AuthErrorCode::Known(
                KnownAuthErrorCode::ServerError | KnownAuthErrorCode::TemporarilyUnavailable
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;
    use url::Url;

    use super::*;

    #[test]
    fn deserialize_known_error_code() {
        let parsed = AuthErrorCode::from_str("login_required");
        assert_that(parsed).is_equal_to(AuthErrorCode::Known(KnownAuthErrorCode::LoginRequired));
    }

    #[test]
    fn deserialize_unknown_error_code() {
        let parsed = AuthErrorCode::from_str("some_unknown_error");
        assert_that(parsed).is_equal_to(AuthErrorCode::Unknown("some_unknown_error".to_owned()));
    }

    #[test]
    fn parse_success_fragment() {
        let url = Url::parse(
            "https://app.example.com/callback#access_token=abc&id_token=x.eyJzdWIiOiJzIn0.y&expires_in=7200&token_type=Bearer&state=opaque",
        )
        .unwrap();

        let parsed = CallbackResponse::from_redirect_url(&url);
        let CallbackResponse::Success(payload) = parsed else {
            panic!("expected success, got {parsed:?}");
        };
        assert_that(payload.access_token).is_equal_to(Some("abc".to_owned()));
        assert_that(payload.id_token).is_equal_to(Some("x.eyJzdWIiOiJzIn0.y".to_owned()));
        assert_that(payload.expires_in).is_equal_to(Some(7200));
        assert_that(payload.token_type).is_equal_to(Some("Bearer".to_owned()));
        assert_that(payload.state).is_equal_to(Some("opaque".to_owned()));
        // "eyJzdWIiOiJzIn0" is base64url for {"sub":"s"}.
        assert_that(payload.id_token_claims.unwrap().subject).is_equal_to(Some("s".to_owned()));
    }

    #[test]
    fn parse_error_fragment() {
        let url = Url::parse(
            "https://app.example.com/callback#error=login_required&error_description=User%20session%20not%20found",
        )
        .unwrap();

        let parsed = CallbackResponse::from_redirect_url(&url);
        let CallbackResponse::Error(response) = parsed else {
            panic!("expected error, got {parsed:?}");
        };
        assert_that(response.requires_interactive_login()).is_true();
        assert_that(response.is_transient()).is_false();
        assert_that(response.error_description)
            .is_equal_to(Some("User session not found".to_owned()));
    }

    #[test]
    fn parse_fragmentless_url_as_empty_payload() {
        let url = Url::parse("https://app.example.com/callback").unwrap();
        let parsed = CallbackResponse::from_redirect_url(&url);
        assert_that(parsed).is_equal_to(CallbackResponse::Success(AuthPayload::default()));
    }
}
