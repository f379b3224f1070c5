//! # sevahub-auth
//!
//! Token verification. The rest of the system consumes authentication
//! through the [`jwt::TokenVerifier`] trait — an opaque
//! "verify token → subject identity" function. [`jwt::JwtVerifier`] is the
//! HS256 implementation; token *issuance* belongs to an external identity
//! service and is not handled here.

pub mod jwt;

pub use jwt::{JwtVerifier, TokenVerifier, VerifiedSubject};
