//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header and resolves the subject identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use sevahub_auth::VerifiedSubject;
use sevahub_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated caller, available to every handler that lists it.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub VerifiedSubject);

impl std::ops::Deref for AuthUser {
    type Target = VerifiedSubject;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::authentication("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::authentication("Invalid Authorization header format"))?;

        let subject = state.verifier.verify(token).await?;

        Ok(AuthUser(subject))
    }
}
