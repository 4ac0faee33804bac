//! HS256 JSON Web Token verifier.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::{AuthError, Identity, IdentityVerifier, UserId};

/// JWT claims issued at login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id; numeric ids are accepted and read as text
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Stateless verifier keyed by a shared secret
#[derive(Clone)]
pub struct JwtIdentityVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Mint a token for `identity` valid for `ttl`.
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, AuthError> {
        let claims = Claims {
            id: identity.user_id.as_str().to_string(),
            username: identity.username.clone(),
            is_admin: identity.is_admin,
            exp: (Utc::now() + ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("token encoding failed: {}", err);
            AuthError::InvalidToken
        })
    }
}

impl IdentityVerifier for JwtIdentityVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                ErrorKind::InvalidSignature => AuthError::SignatureMismatch,
                _ => AuthError::InvalidToken,
            }
        })?;

        let user_id = UserId::new(data.claims.id).map_err(|_| AuthError::InvalidToken)?;
        Ok(Identity {
            user_id,
            username: data.claims.username,
            is_admin: data.claims.is_admin,
        })
    }
}
