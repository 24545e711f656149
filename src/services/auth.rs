use std::sync::Arc;

use entities::user::{NewUser, Role, User};
use log::{info, warn};
use tokio::sync::OnceCell;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{Claims, TokenKeys};
use crate::config::BootstrapAdmin;
use crate::error::ApiError;
use crate::repository::UserRepository;
use crate::requests::{LoginRequest, RegisterRequest};
use crate::responses::{AuthResponse, UserResponse};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenKeys>,
    bcrypt_cost: u32,
    /// Verified against on unknown usernames so both failures cost one bcrypt check.
    decoy_hash: Arc<OnceCell<String>>,
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    let length = username.chars().count();
    let allowed = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !(3..=50).contains(&length) || !allowed {
        return Err(ApiError::BadRequest(
            "Username must be 3-50 characters of letters, digits, '_', '.' or '-'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let shaped = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !shaped || email.len() > 100 {
        return Err(ApiError::BadRequest("A valid email address is required".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    Ok(())
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenKeys>, bcrypt_cost: u32) -> Self {
        AuthService {
            users,
            tokens,
            bcrypt_cost,
            decoy_hash: Arc::new(OnceCell::new()),
        }
    }

    async fn decoy_hash(&self) -> Result<String, ApiError> {
        let hash = self
            .decoy_hash
            .get_or_try_init(|| hash_password("decoy-password".to_string(), self.bcrypt_cost))
            .await?;
        Ok(hash.clone())
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            token: self.tokens.issue(user)?,
            user: UserResponse::from(user),
        })
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, ApiError> {
        validate_username(username)?;
        validate_email(email)?;
        validate_password(password)?;
        if self
            .users
            .get_user_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            return Err(ApiError::Conflict("Username or email already exists".to_string()));
        }
        let hash = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let user = self
            .users
            .create_user(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password: hash,
                role,
            })
            .await?;
        Ok(user)
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, ApiError> {
        let user = self
            .create(
                request.username.trim(),
                request.email.trim(),
                &request.password,
                Role::User,
            )
            .await?;
        info!("Registered user {} ({})", user.username, user.id);
        self.respond(&user)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ApiError> {
        let user = match self.users.get_user_by_username(request.username.trim()).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown user {}", request.username);
                verify_password(request.password, self.decoy_hash().await?).await?;
                return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
            }
        };
        if !verify_password(request.password, user.password.clone()).await? {
            warn!("Wrong password for user {}", user.username);
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
        self.respond(&user)
    }

    pub async fn me(&self, claims: &Claims) -> Result<UserResponse, ApiError> {
        self.users
            .get_user(claims.sub)
            .await?
            .map(|user| UserResponse::from(&user))
            .ok_or_else(|| ApiError::not_found("User", claims.sub))
    }

    /// Creates the configured admin account unless the username is taken.
    pub async fn ensure_admin(&self, admin: &BootstrapAdmin) -> Result<(), ApiError> {
        if self.users.get_user_by_username(&admin.username).await?.is_some() {
            return Ok(());
        }
        match self
            .create(&admin.username, &admin.email, &admin.password, Role::Admin)
            .await
        {
            Ok(user) => {
                info!("Created bootstrap admin {}", user.username);
                Ok(())
            }
            Err(ApiError::Conflict(_)) => {
                warn!("Bootstrap admin email {} belongs to another user", admin.email);
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
