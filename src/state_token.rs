use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;

/// 32 bytes of cryptographically secure random data, base64 url encoded as a
/// 43 character string.
fn random_token() -> String {
    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Cryptographically secure token sent as the `state` parameter of an
/// authorization request and echoed back by the provider in the redirect
/// fragment, used to avoid CSRF attacks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StateToken {
    state_token: String,
}

impl StateToken {
    pub fn new() -> Self {
        Self {
            state_token: random_token(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.state_token
    }

    /// Whether the value the provider echoed back is this token.
    pub fn validate(&self, echoed: Option<&str>) -> bool {
        echoed == Some(self.state_token.as_str())
    }
}

impl Default for StateToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Value sent as the `nonce` parameter of an authorization request and
/// reproduced by the provider inside the issued id token's claims, used to
/// mitigate token replay.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Nonce {
    nonce: String,
}

impl Nonce {
    pub fn new() -> Self {
        Self {
            nonce: random_token(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.nonce
    }

    /// Whether the `nonce` claim carried by an id token is this nonce.
    pub fn validate(&self, claimed: Option<&str>) -> bool {
        claimed == Some(self.nonce.as_str())
    }
}

impl Default for Nonce {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertr::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn generate_token_on_creation() {
        let token = StateToken::new();
        assert_that(token.as_str()).is_not_empty().has_length(43);

        let nonce = Nonce::new();
        assert_that(nonce.as_str()).is_not_empty().has_length(43);
    }

    #[test]
    fn tokens_are_unique() {
        let mut tokens = HashSet::new();

        for _ in 0..100 {
            assert_that(tokens.insert(StateToken::new()))
                .with_detail_message("Generated duplicate token.")
                .with_detail_message(format!("{tokens:?}"))
                .is_true();
        }
    }

    #[test]
    fn validate_accepts_only_the_exact_echo() {
        let token = StateToken::new();
        assert_that(token.validate(Some(token.as_str()))).is_true();
        assert_that(token.validate(Some("attacker-chosen"))).is_false();
        assert_that(token.validate(None)).is_false();
    }

    #[test]
    fn nonce_validate_accepts_only_the_exact_claim() {
        let nonce = Nonce::new();
        assert_that(nonce.validate(Some(nonce.as_str()))).is_true();
        assert_that(nonce.validate(Some(StateToken::new().as_str()))).is_false();
        assert_that(nonce.validate(None)).is_false();
    }
}
