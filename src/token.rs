use time::{Duration, OffsetDateTime};

use crate::AccessToken;
use crate::token_claims::IdTokenClaims;

/// The in-memory credential record: access token, decoded identity claims and
/// the absolute point in time at which the access token expires.
///
/// All three fields are populated together by [`Credential::set`] and cleared
/// together by [`Credential::clear`]; no partially-set state is observable.
/// Nothing is persisted, the record lives and dies with its owning
/// [`crate::SessionManager`].
#[derive(Debug, Default)]
pub(crate) struct Credential {
    access_token: Option<AccessToken>,
    claims: Option<IdTokenClaims>,
    expires_at: Option<OffsetDateTime>,
}

impl Credential {
    /// Atomically replaces the whole record. `expires_at` becomes
    /// `now + expires_in` seconds.
    pub(crate) fn set(
        &mut self,
        access_token: AccessToken,
        claims: Option<IdTokenClaims>,
        expires_in: i64,
    ) {
        tracing::debug!(expires_in, "Token expires in {expires_in} seconds");
        self.access_token = Some(access_token);
        self.claims = claims;
        self.expires_at = Some(OffsetDateTime::now_utc() + Duration::seconds(expires_in));
    }

    /// Atomically empties the whole record.
    pub(crate) fn clear(&mut self) {
        self.access_token = None;
        self.claims = None;
        self.expires_at = None;
    }

    /// Whether the stored expiry instant has been reached. The boundary
    /// instant itself counts as expired. `false` when no expiry is stored.
    pub(crate) fn is_token_expired(&self) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= OffsetDateTime::now_utc())
    }

    /// A token is held, and its expiry lies strictly in the future.
    pub(crate) fn has_valid_token(&self) -> bool {
        self.access_token.is_some() && !self.is_token_expired()
    }

    /// A token is held, but its expiry has passed. Always the negation of
    /// [`Credential::has_valid_token`] while a token is present; both are
    /// `false` without one.
    pub(crate) fn has_expired_token(&self) -> bool {
        self.access_token.is_some() && self.is_token_expired()
    }

    /// Valid token plus decoded claims. This is what the UI treats as
    /// "logged in".
    pub(crate) fn is_authenticated(&self) -> bool {
        self.has_valid_token() && self.claims.is_some()
    }

    pub(crate) fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub(crate) fn user_id(&self) -> Option<&str> {
        self.claims.as_ref()?.subject.as_deref()
    }

    pub(crate) fn permissions(&self) -> &[String] {
        self.claims
            .as_ref()
            .map(|claims| claims.permissions.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use assertr::prelude::*;

    use super::*;

    fn claims_with_subject(subject: &str) -> IdTokenClaims {
        IdTokenClaims {
            subject: Some(subject.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn fresh_credential_is_empty() {
        let credential = Credential::default();
        assert_that(credential.access_token()).is_equal_to(None);
        assert_that(credential.user_id()).is_equal_to(None);
        assert_that(credential.permissions().len()).is_equal_to(0);
        assert_that(credential.is_token_expired()).is_false();
        assert_that(credential.has_valid_token()).is_false();
        assert_that(credential.has_expired_token()).is_false();
        assert_that(credential.is_authenticated()).is_false();
    }

    #[test]
    fn set_then_query() {
        let mut credential = Credential::default();
        credential.set("abc".to_owned(), Some(claims_with_subject("auth0|1")), 86400);

        assert_that(credential.access_token()).is_equal_to(Some("abc"));
        assert_that(credential.user_id()).is_equal_to(Some("auth0|1"));
        assert_that(credential.has_valid_token()).is_true();
        assert_that(credential.has_expired_token()).is_false();
        assert_that(credential.is_authenticated()).is_true();
    }

    #[test]
    fn expiry_is_the_lifetime_added_to_the_instant_of_set() {
        let mut credential = Credential::default();

        let before = OffsetDateTime::now_utc();
        credential.set("abc".to_owned(), None, 86400);
        let after = OffsetDateTime::now_utc();

        let expires_at = credential.expires_at.unwrap();
        assert_that(expires_at >= before + Duration::seconds(86400)).is_true();
        assert_that(expires_at <= after + Duration::seconds(86400)).is_true();
    }

    #[test]
    fn zero_lifetime_counts_as_expired() {
        let mut credential = Credential::default();
        credential.set("abc".to_owned(), None, 0);

        assert_that(credential.is_token_expired()).is_true();
        assert_that(credential.has_valid_token()).is_false();
        assert_that(credential.has_expired_token()).is_true();
        assert_that(credential.is_authenticated()).is_false();
    }

    #[test]
    fn expired_token_and_valid_token_are_mutually_exclusive() {
        let mut credential = Credential::default();

        credential.set("abc".to_owned(), None, 3600);
        assert_that(credential.has_valid_token() ^ credential.has_expired_token()).is_true();

        credential.set("abc".to_owned(), None, -3600);
        assert_that(credential.has_valid_token() ^ credential.has_expired_token()).is_true();
    }

    #[test]
    fn valid_token_without_claims_is_not_authenticated() {
        let mut credential = Credential::default();
        credential.set("abc".to_owned(), None, 3600);

        assert_that(credential.has_valid_token()).is_true();
        assert_that(credential.is_authenticated()).is_false();
    }

    #[test]
    fn clear_empties_every_field() {
        let mut credential = Credential::default();
        credential.set("abc".to_owned(), Some(claims_with_subject("auth0|1")), 3600);
        credential.clear();

        assert_that(credential.access_token()).is_equal_to(None);
        assert_that(credential.user_id()).is_equal_to(None);
        assert_that(credential.permissions().len()).is_equal_to(0);
        assert_that(credential.has_expired_token()).is_false();
    }
}
