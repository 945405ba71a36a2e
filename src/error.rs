use crate::provider::ProviderError;
use snafu::Snafu;

/// An enumeration representing various authentication-related errors.
///
/// All asynchronous session operations reject with this type. Synchronous
/// credential queries never fail; they degrade to `None` / empty defaults.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SessionError {
    /// The identity provider reported an error on one of its operations.
    /// The provider's error value is passed through verbatim.
    #[snafu(display("SessionError: identity provider reported an error"))]
    Provider { source: ProviderError },

    /// The provider's response was well-formed but lacked an access token or
    /// an id token. The credential is left untouched when this is raised.
    #[snafu(display("SessionError: callback payload lacks an access or id token"))]
    MissingToken,

    /// A provider endpoint URL could not be derived from the configured base
    /// URL. Raised at construction time only, and fatal to the caller.
    #[snafu(display("SessionError: could not derive provider endpoint: {source}"))]
    Endpoint { source: url::ParseError },

    /// The HTTP client backing the provider client could not be built.
    /// Raised at construction time only, and fatal to the caller.
    #[snafu(display("SessionError: could not construct HTTP client"))]
    HttpClient { source: reqwest::Error },
}
