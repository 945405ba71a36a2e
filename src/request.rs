use http::header::LOCATION;
use snafu::ResultExt;
use url::Url;

use crate::provider::{LocationSnafu, NoRedirectSnafu, ProviderError, RemoteLogoutSnafu, SendSnafu};

/// Issues a `prompt=none` authorization request and returns the URL the
/// provider redirected to. That URL's fragment carries the outcome, in the
/// same shape as an interactive login callback.
///
/// `http` must have redirect following disabled, otherwise the redirect (and
/// with it the fragment) is consumed before we can look at it.
pub(crate) async fn silent_authentication(
    http: &reqwest::Client,
    authorize_url: Url,
) -> Result<Url, ProviderError> {
    let response = http
        .get(authorize_url)
        .send()
        .await
        .context(SendSnafu {})?;

    let status = response.status();
    if !status.is_redirection() {
        return NoRedirectSnafu { status }.fail();
    }

    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    Url::parse(location).context(LocationSnafu {})
}

/// Calls the provider's remote logout endpoint. The provider answers the
/// `returnTo` target with a redirect, which counts as success just like a
/// plain 2xx.
pub(crate) async fn remote_logout(
    http: &reqwest::Client,
    logout_url: Url,
) -> Result<(), ProviderError> {
    let response = http
        .get(logout_url)
        .send()
        .await
        .context(SendSnafu {})?;

    let status = response.status();
    match status.is_success() || status.is_redirection() {
        true => Ok(()),
        false => RemoteLogoutSnafu { status }.fail(),
    }
}
