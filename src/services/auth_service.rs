use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::{required, ServiceError, ServiceResult};
use crate::auth::{self, Claims, MIN_PASSWORD_LEN};
use crate::config::SecurityConfig;
use crate::database::models::{NewUser, User};
use crate::database::{DatabaseError, WorkspaceStore};

/// Issued on signup and login
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: User,
    /// Seconds until the token expires
    pub expires_in: u64,
}

pub struct AuthService {
    store: Arc<dyn WorkspaceStore>,
    security: SecurityConfig,
}

impl AuthService {
    pub fn new(store: Arc<dyn WorkspaceStore>, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> ServiceResult<Session> {
        const MISSING: &str = "Name, email and password are required";
        let full_name = required(name, MISSING)?;
        let email = required(email, MISSING)?.to_lowercase();
        required(password, MISSING)?;

        if !auth::validate_email(&email) {
            return Err(ServiceError::validation("Invalid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let password_hash = self.hash(password).await?;
        let user = self
            .store
            .create_user(NewUser {
                email,
                full_name,
                password_hash,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => {
                    ServiceError::Conflict("An account with this email already exists".to_string())
                }
                other => other.into(),
            })?;

        info!(user_id = %user.id, "user signed up");
        self.session(user)
    }

    pub async fn login(&self, email: &str, password: &str) -> ServiceResult<Session> {
        const MISSING: &str = "Email and password are required";
        let email = required(email, MISSING)?.to_lowercase();
        required(password, MISSING)?;

        let Some(user) = self.store.find_user_by_email(&email).await? else {
            warn!("login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.verify(password, &user.password_hash).await? {
            warn!(user_id = %user.id, "login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        self.session(user)
    }

    pub async fn whoami(&self, user_id: Uuid) -> ServiceResult<User> {
        self.store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found"))
    }

    fn session(&self, user: User) -> ServiceResult<Session> {
        let claims = Claims::new(user.id, user.email.clone(), &self.security);
        let token = auth::generate_jwt(&claims, &self.security)?;

        Ok(Session {
            token,
            user,
            expires_in: self.security.jwt_expiry_hours * 3600,
        })
    }

    // bcrypt is CPU bound; keep it off the async workers.
    async fn hash(&self, password: &str) -> ServiceResult<String> {
        let password = password.to_string();
        let cost = self.security.bcrypt_cost;
        tokio::task::spawn_blocking(move || auth::hash_password(&password, cost))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(ServiceError::from)
    }

    async fn verify(&self, password: &str, hash: &str) -> ServiceResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || auth::verify_password(&password, &hash))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(ServiceError::from)
    }
}
