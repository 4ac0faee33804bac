//! Credential verification.

pub mod jwt;

pub use jwt::JwtIdentityVerifier;
