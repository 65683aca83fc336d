use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_DURATION_SECS: i64 = 24 * 3600; // 24 hours
pub const ISSUER: &str = "earthpulse";

/// JWT Claims stored in the token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
}

/// Issues and checks HS256 bearer tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
}

impl JwtService {
    pub fn new(secret: &str, issuer: String) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
        }
    }

    pub fn create_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(TOKEN_DURATION_SECS);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a JWT token. Returns claims if valid and not expired.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new("test-secret-key", ISSUER.to_string())
    }

    #[test]
    fn roundtrip_token() {
        let svc = test_service();
        let user_id = Uuid::new_v4();
        let token = svc.create_token(user_id, "ranger@example.org").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.email, "ranger@example.org");
        assert_eq!(claims.iss, "earthpulse");
    }

    #[test]
    fn rejects_invalid_token() {
        assert!(test_service().verify_token("garbage").is_err());
    }

    #[test]
    fn rejects_wrong_secret() {
        let svc1 = JwtService::new("secret-a", ISSUER.to_string());
        let svc2 = JwtService::new("secret-b", ISSUER.to_string());
        let token = svc1.create_token(Uuid::new_v4(), "a@b.c").unwrap();
        assert!(svc2.verify_token(&token).is_err());
    }

    #[test]
    fn rejects_foreign_issuer() {
        let other = JwtService::new("test-secret-key", "someone-else".to_string());
        let token = other.create_token(Uuid::new_v4(), "a@b.c").unwrap();
        assert!(test_service().verify_token(&token).is_err());
    }

    #[test]
    fn token_expiry_is_24h() {
        let svc = test_service();
        let token = svc.create_token(Uuid::new_v4(), "a@b.c").unwrap();
        let claims = svc.verify_token(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }
}
