use crate::error::AppError;
use crate::models::auth_jwt_claims::Claims;
use crate::models::authenticated_user::AuthenticatedUser;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use log::{debug, error, info, trace};
use uuid::Uuid;

// Default token lifetime in hours
pub const DEFAULT_TOKEN_DURATION_HOURS: i64 = 24;

// Issuer name for JWT tokens
pub const JWT_ISSUER: &str = "gym-studio";

/// A freshly signed session token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens with the server secret.
///
/// The lifetime is fixed at construction; callers cannot choose it per token.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenService {
    /// Initialize the JWT keys from the secret
    pub fn new(jwt_secret: &str, token_duration_hours: i64) -> Result<Self, AppError> {
        if jwt_secret.is_empty() {
            return Err(AppError::Configuration("JWT secret must not be empty".to_string()));
        }

        let lifetime = Duration::try_hours(token_duration_hours)
            .filter(|lifetime| *lifetime > Duration::zero())
            .ok_or_else(|| {
                AppError::Configuration(format!("Invalid token duration: {} hours", token_duration_hours))
            })?;

        info!("Initializing JWT keys (token lifetime: {} hours)", token_duration_hours);

        let secret = jwt_secret.as_bytes();
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Generate a session token for an authenticated account
    pub fn issue(&self, identity: &AuthenticatedUser) -> Result<IssuedToken, AppError> {
        let iat = Utc::now();
        let exp = iat
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AppError::Internal("Failed to calculate JWT expiration time".to_string()))?;

        let claims = Claims {
            sub: identity.user_id.to_string(),
            role: identity.role,
            exp: exp.timestamp() as usize,
            iat: iat.timestamp() as usize,
            iss: JWT_ISSUER.to_string(),
        };

        debug!("Generating JWT token for account {} (exp: {})", identity.user_id, exp);
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            error!("Failed to generate JWT token: {}", e);
            AppError::Internal(format!("Token generation failed: {}", e))
        })?;

        Ok(IssuedToken {
            token,
            expires_at: exp,
        })
    }

    /// Verify a token and recover the identity it carries
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        trace!("Verifying JWT token");

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[JWT_ISSUER]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|err| {
            debug!("JWT validation failed: {}", err);
            match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Auth("Token has expired".to_string()),
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Auth("Invalid token signature".to_string()),
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => AppError::Auth("Invalid token issuer".to_string()),
                _ => AppError::Auth("Invalid token".to_string()),
            }
        })?;

        let user_id = Uuid::parse_str(&token_data.claims.sub)
            .map_err(|_| AppError::Auth("Invalid subject in token".to_string()))?;

        debug!("JWT token verified successfully for account {}", user_id);
        Ok(AuthenticatedUser {
            user_id,
            role: token_data.claims.role,
        })
    }
}
