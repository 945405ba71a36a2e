use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::SubjectIdentifier;

/// Decoded identity claims carried by an id token's payload segment.
///
/// Only the claims this library itself reads are typed; everything else the
/// provider includes (issuer, audience, custom namespaced claims, ...) is kept
/// verbatim in [`IdTokenClaims::additional`].
///
/// See: <https://openid.net/specs/openid-connect-core-1_0.html#IDToken>
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct IdTokenClaims {
    /// (sub) Subject Identifier. A locally unique and never reassigned
    /// identifier within the Issuer for the End-User,
    /// e.g., `24400320` or `auth0|AItOawmwtWwcT0k51BayewNvutrJUqsvl6qs7A4`.
    #[serde(rename = "sub")]
    pub subject: Option<SubjectIdentifier>,

    /// (email) End-User's preferred e-mail address. Requested through the
    /// `email` scope.
    pub email: Option<String>,

    /// (nonce) Value the client sent with the authentication request,
    /// reproduced here by the provider so the token can be tied back to that
    /// request.
    pub nonce: Option<String>,

    /// Permissions granted to the user, as configured in the provider's
    /// authorization settings. Providers omit this claim entirely when no
    /// permissions are assigned.
    #[serde(default)]
    pub permissions: Vec<String>,

    /// Any remaining claims of the payload, untouched.
    #[serde(flatten)]
    pub additional: HashMap<String, serde_json::Value>,
}

/// Decodes the payload segment of a JWT-shaped id token.
///
/// No signature verification takes place: in the implicit flow the token
/// arrives over the provider's redirect, and all trust decisions rest on that
/// channel. A token that cannot be decoded yields `None`, leaving the caller
/// with tokens but no claims.
pub(crate) fn decode_id_token_payload(id_token: &str) -> Option<IdTokenClaims> {
    let payload = id_token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|err| tracing::warn!(?err, "Id token payload is not valid base64url"))
        .ok()?;
    serde_json::from_slice::<IdTokenClaims>(&bytes)
        .map_err(|err| tracing::warn!(?err, "Id token payload is not a valid claims object"))
        .ok()
}
