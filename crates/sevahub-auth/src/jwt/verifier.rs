//! Token verification — the gateway's "verify token → subject identity" seam.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use uuid::Uuid;

use sevahub_core::config::auth::AuthConfig;
use sevahub_core::error::AppError;

use super::claims::Claims;

/// The identity extracted from a successfully verified credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedSubject {
    /// The authenticated user.
    pub user_id: Uuid,
}

/// Verifies a bearer credential and resolves the subject identity.
///
/// Injected into the gateway so that the token issuer stays an external
/// collaborator; verification may call out and is therefore async.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a token string. Any failure — bad signature, expiry, or a
    /// payload without a usable subject — is an authentication error.
    async fn verify(&self, token: &str) -> Result<VerifiedSubject, AppError>;
}

/// HS256 JWT verifier.
#[derive(Clone)]
pub struct JwtVerifier {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtVerifier {
    /// Creates a new verifier from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = config.leeway_seconds;

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decode and validate the raw token.
    fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedSubject, AppError> {
        let claims = self.decode_token(token)?;

        let user_id = claims
            .subject()
            .ok_or_else(|| AppError::authentication("Token carries no usable subject claim"))?;

        Ok(VerifiedSubject { user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use sevahub_core::error::ErrorKind;

    const SECRET: &str = "test-secret";

    fn verifier() -> JwtVerifier {
        JwtVerifier::new(&AuthConfig {
            jwt_secret: SECRET.to_string(),
            leeway_seconds: 0,
        })
    }

    fn token_for(claims: &Claims) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_verify_valid_token() {
        let user_id = Uuid::new_v4();
        let token = token_for(&Claims {
            sub: Some(user_id.to_string()),
            user_id: None,
            uid: None,
            exp: Utc::now().timestamp() + 600,
            iat: Some(Utc::now().timestamp()),
        });

        let subject = verifier().verify(&token).await.unwrap();
        assert_eq!(subject.user_id, user_id);
    }

    #[tokio::test]
    async fn test_verify_accepts_user_id_claim() {
        let user_id = Uuid::new_v4();
        let token = token_for(&Claims {
            sub: None,
            user_id: Some(user_id),
            uid: None,
            exp: Utc::now().timestamp() + 600,
            iat: None,
        });

        let subject = verifier().verify(&token).await.unwrap();
        assert_eq!(subject.user_id, user_id);
    }

    #[tokio::test]
    async fn test_verify_rejects_expired_token() {
        let token = token_for(&Claims {
            sub: Some(Uuid::new_v4().to_string()),
            user_id: None,
            uid: None,
            exp: Utc::now().timestamp() - 600,
            iat: None,
        });

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let err = verifier().verify("not-a-token").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_verify_rejects_token_without_subject() {
        let token = token_for(&Claims {
            sub: Some("service-account".to_string()),
            user_id: None,
            uid: None,
            exp: Utc::now().timestamp() + 600,
            iat: None,
        });

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
}
