use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Bearer Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// JWT Service for validating bearer tokens (HS256)
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 30;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign a token for `subject` valid for `ttl_minutes`
    ///
    /// Used by operators and integration tests; the service itself only validates.
    pub fn generate_token(
        &self,
        subject: &str,
        ttl_minutes: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Validate Bearer Token
    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::errors::ErrorKind;

    #[test]
    fn test_generate_and_validate() {
        let service = JwtService::new("test-secret");
        let token = service.generate_token("ops", 5).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "ops");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtService::new("secret-a").generate_token("ops", 5).unwrap();
        let err = JwtService::new("secret-b").validate_token(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidSignature));
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = JwtService::new("test-secret");
        let token = service.generate_token("ops", -10).unwrap();
        let err = service.validate_token(&token).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::ExpiredSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        let service = JwtService::new("test-secret");
        assert!(service.validate_token("not.a.jwt").is_err());
    }
}
