use crate::config::TokenConfig;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claims embedded in every session token. No `exp` claim is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    #[serde(default)]
    pub iat: i64,
}

/// Stateless HS256 token issuer and verifier.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Signature and algorithm only: no expiry, audience or issuer checks.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(config.secret()),
            decoding_key: DecodingKey::from_secret(config.secret()),
            validation,
        }
    }

    pub fn issue(&self, username: &str) -> Result<String, TokenError> {
        let claims = Claims {
            username: username.to_string(),
            iat: Utc::now().timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {}", e);
                TokenError::InvalidToken
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&TokenConfig::new(secret.as_bytes().to_vec()))
    }

    #[test]
    fn test_issue_then_verify_returns_username() {
        let tokens = service("unit-test-secret");
        let token = tokens.issue("alice").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert!(claims.iat > 0);
    }

    #[test]
    fn test_verify_rejects_foreign_signature() {
        let token = service("secret-one").issue("alice").unwrap();

        let result = service("secret-two").verify(&token);
        assert!(matches!(result, Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let tokens = service("unit-test-secret");
        assert!(matches!(
            tokens.verify("not.a.token"),
            Err(TokenError::InvalidToken)
        ));
        assert!(matches!(tokens.verify(""), Err(TokenError::InvalidToken)));
    }

    #[test]
    fn test_tokens_without_iat_are_accepted() {
        #[derive(Serialize)]
        struct Legacy<'a> {
            username: &'a str,
        }

        let secret = "unit-test-secret";
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Legacy { username: "bob" },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let claims = service(secret).verify(&token).unwrap();
        assert_eq!(claims.username, "bob");
        assert_eq!(claims.iat, 0);
    }
}
