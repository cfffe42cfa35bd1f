//! Authentication utilities

use anyhow::Result;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::models::User;

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// Owner id the token grants access to
    pub user_id: i64,
    /// External provider id the user logged in with
    #[serde(default)]
    pub provider_id: String,
    pub exp: usize,
}

/// Issues and verifies bearer tokens with a shared HS256 secret
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    max_age_secs: u64,
}

impl TokenIssuer {
    pub fn new(secret: &str, max_age_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            max_age_secs,
        }
    }

    /// Create an access token for a user
    pub fn issue(&self, user: &User) -> Result<String> {
        let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + self.max_age_secs;

        let claims = Claims {
            user_id: user.id,
            provider_id: user.provider_id.clone(),
            exp: expiration as usize,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<Claims>(token, &self.decoding, &validation)?;
        Ok(token_data.claims)
    }
}

/// generate a random string of the given length
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 3,
            provider_id: "demo_user_123".into(),
            email: String::new(),
            display_name: "Demo".into(),
            created_at: 0,
        }
    }

    #[test]
    fn test_random_string() {
        let s1 = generate_random_string(32);
        let s2 = generate_random_string(32);

        assert_eq!(s1.len(), 32);
        assert_eq!(s2.len(), 32);
        assert_ne!(s1, s2); // Should be different (with very high probability)
    }

    #[test]
    fn test_issue_and_verify() {
        let issuer = TokenIssuer::new("secret", 3600);
        let token = issuer.issue(&user()).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.user_id, 3);
        assert_eq!(claims.provider_id, "demo_user_123");
    }

    #[test]
    fn test_rejects_foreign_secret() {
        let token = TokenIssuer::new("secret", 3600).issue(&user()).unwrap();
        assert!(TokenIssuer::new("other", 3600).verify(&token).is_err());
        assert!(TokenIssuer::new("secret", 3600).verify("not-a-token").is_err());
    }
}
