//! Signed JWTs for access, refresh and email confirmation
//!
//! All three share one key and algorithm; the `scope` claim keeps a refresh
//! token from being accepted where an access token is expected.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::config::JwtSettings;

/// What a token may be used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenScope {
    AccessToken,
    RefreshToken,
    EmailToken,
}

impl TokenScope {
    pub fn lifetime(self) -> Duration {
        match self {
            Self::AccessToken => Duration::minutes(15),
            Self::RefreshToken => Duration::days(7),
            Self::EmailToken => Duration::days(1),
        }
    }
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User email
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub scope: TokenScope,
}

/// Access/refresh pair returned by login and refresh
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
}

/// Issues and verifies tokens
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    algorithm: Algorithm,
}

impl TokenService {
    pub fn new(settings: &JwtSettings) -> Self {
        Self {
            encoding: EncodingKey::from_secret(settings.secret.as_bytes()),
            decoding: DecodingKey::from_secret(settings.secret.as_bytes()),
            algorithm: settings.algorithm,
        }
    }

    /// Issue a token for `email` valid from now.
    pub fn issue(&self, email: &str, scope: TokenScope) -> Result<String, AuthError> {
        self.issue_at(email, scope, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    pub fn issue_at(
        &self,
        email: &str,
        scope: TokenScope,
        now: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let claims = Claims {
            sub: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + scope.lifetime()).timestamp(),
            scope,
        };
        Ok(encode(&Header::new(self.algorithm), &claims, &self.encoding)?)
    }

    /// Issue a fresh access/refresh pair.
    pub fn issue_pair(&self, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue(email, TokenScope::AccessToken)?,
            refresh_token: self.issue(email, TokenScope::RefreshToken)?,
            token_type: "bearer",
        })
    }

    /// Verify signature, expiry and scope; returns the subject email.
    pub fn verify(&self, token: &str, expected: TokenScope) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::new(self.algorithm))?;

        if data.claims.scope != expected {
            return Err(AuthError::InvalidScope {
                expected,
                actual: data.claims.scope,
            });
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, algorithm: Algorithm) -> TokenService {
        TokenService::new(&JwtSettings {
            secret: secret.into(),
            algorithm,
        })
    }

    #[test]
    fn access_token_round_trip() {
        let tokens = service("k", Algorithm::HS256);
        let token = tokens.issue("a@b.com", TokenScope::AccessToken).unwrap();
        assert_eq!(
            tokens.verify(&token, TokenScope::AccessToken).unwrap(),
            "a@b.com"
        );
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let tokens = service("k", Algorithm::HS512);
        let pair = tokens.issue_pair("a@b.com").unwrap();
        assert_eq!(pair.token_type, "bearer");

        let err = tokens
            .verify(&pair.refresh_token, TokenScope::AccessToken)
            .unwrap_err();
        assert!(matches!(
            err,
            AuthError::InvalidScope {
                expected: TokenScope::AccessToken,
                actual: TokenScope::RefreshToken
            }
        ));
    }

    #[test]
    fn expired_token_rejected() {
        let tokens = service("k", Algorithm::HS256);
        let issued = Utc::now() - Duration::days(2);
        let token = tokens
            .issue_at("a@b.com", TokenScope::EmailToken, issued)
            .unwrap();
        assert!(matches!(
            tokens.verify(&token, TokenScope::EmailToken),
            Err(AuthError::Token(_))
        ));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = service("one", Algorithm::HS256)
            .issue("a@b.com", TokenScope::AccessToken)
            .unwrap();
        assert!(service("two", Algorithm::HS256)
            .verify(&token, TokenScope::AccessToken)
            .is_err());
    }

    #[test]
    fn scope_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&TokenScope::RefreshToken).unwrap(),
            "\"refresh_token\""
        );
    }
}
