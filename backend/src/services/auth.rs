//! Authentication service
//!
//! Email/password login issuing JWT access and refresh tokens. Refresh
//! tokens are stateless: a refresh is just a signed token with a longer
//! expiry and a `refresh` marker claim.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::JwtConfig;
use crate::error::{AppError, AppResult};
use shared::{UserProfile, UserRole};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt: JwtConfig,
}

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Refresh request payload
#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Issued token pair
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login response: tokens plus the profile the portal needs immediately
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    exp: i64,
    iat: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    refresh: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    full_name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl UserRow {
    fn into_profile(self) -> AppResult<UserProfile> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown user role: {}", self.role)))?;
        Ok(UserProfile {
            id: self.id,
            email: self.email,
            full_name: self.full_name,
            role,
            created_at: self.created_at,
        })
    }
}

const USER_COLUMNS: &str = "id, email, full_name, role, password_hash, created_at";

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, jwt: JwtConfig) -> Self {
        Self { db, jwt }
    }

    /// Verify credentials and issue a token pair
    pub async fn login(&self, input: LoginInput) -> AppResult<LoginResponse> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(input.email.trim().to_lowercase())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = bcrypt::verify(&input.password, &row.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = row.role.clone();
        let user = row.into_profile()?;
        let tokens = self.issue_tokens(user.id, &role)?;

        Ok(LoginResponse { tokens, user })
    }

    /// Exchange a valid refresh token for a fresh token pair
    pub async fn refresh(&self, input: RefreshInput) -> AppResult<AuthTokens> {
        let claims = decode::<Claims>(
            &input.refresh_token,
            &DecodingKey::from_secret(self.jwt.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?
        .claims;

        if !claims.refresh {
            return Err(AppError::InvalidToken);
        }

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::InvalidToken)?;

        // The role may have changed since the refresh token was issued
        let role = sqlx::query_scalar::<_, String>("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::InvalidToken)?;

        self.issue_tokens(user_id, &role)
    }

    /// Get the profile for an authenticated user
    pub async fn get_profile(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.into_profile()
    }

    fn issue_tokens(&self, user_id: Uuid, role: &str) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.jwt.access_token_expiry);
        let refresh_exp = now + Duration::seconds(self.jwt.refresh_token_expiry);

        let access = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
            refresh: false,
        };
        let refresh = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            exp: refresh_exp.timestamp(),
            iat: now.timestamp(),
            refresh: true,
        };

        let key = EncodingKey::from_secret(self.jwt.secret.as_bytes());
        let access_token = encode(&Header::default(), &access, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;
        let refresh_token = encode(&Header::default(), &refresh, &key)
            .map_err(|e| AppError::Internal(format!("Token encoding failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_expiry,
        })
    }
}
