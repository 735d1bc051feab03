//! Organizer authentication service

use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::OrganizerClaims,
};

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Check the organizer credentials and return a JWT token with its
    /// lifetime in seconds
    pub fn login(&self, username: &str, password: &str) -> AppResult<(String, i64)> {
        if username != self.config.admin_username || password != self.config.admin_password {
            tracing::warn!(username, "Rejected organizer login");
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let claims = OrganizerClaims {
            sub: username.to_string(),
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        Ok((token, expires_in))
    }

    /// Validate a bearer token
    pub fn verify(&self, token: &str) -> AppResult<OrganizerClaims> {
        OrganizerClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }
}
