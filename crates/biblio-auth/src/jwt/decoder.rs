//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use biblio_core::config::auth::AuthConfig;
use biblio_core::error::AppError;

use super::claims::Claims;

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks the signature and the expiration claim.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AppError> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use biblio_entity::user::UserRole;

    fn test_config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            jwt_ttl_minutes: 60,
            password_min_length: 8,
            admin_signup_code: String::new(),
        }
    }

    #[test]
    fn test_round_trip() {
        let config = test_config("test-secret");
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);

        let (token, _) = encoder
            .generate_token("USER1", UserRole::Admin, "Ada")
            .unwrap();
        let claims = decoder.decode_token(&token).unwrap();

        assert_eq!(claims.user_id(), "USER1");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.name, "Ada");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let encoder = JwtEncoder::new(&test_config("secret-a"));
        let decoder = JwtDecoder::new(&test_config("secret-b"));

        let (token, _) = encoder
            .generate_token("USER1", UserRole::User, "Ada")
            .unwrap();
        assert!(decoder.decode_token(&token).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let decoder = JwtDecoder::new(&test_config("secret"));
        assert!(decoder.decode_token("not.a.jwt").is_err());
    }
}
