use crate::data::UserRepository;
use crate::domain::user::{LoginUserRequest, RegisterUserRequest, UserResponse};
use crate::domain::DomainError;
use crate::infrastructure::jwt::JwtService;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use std::sync::Arc;

pub struct AuthService {
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            user_repo,
            jwt_service,
        }
    }

    pub async fn register(&self, req: RegisterUserRequest) -> Result<UserResponse, DomainError> {
        tracing::debug!("Registering username: {}", req.username);

        validate_username(&req.username)?;
        if req.password.is_empty() {
            return Err(DomainError::validation("password: This field may not be blank."));
        }

        match self.user_repo.find_by_username(&req.username).await {
            Ok(_) => {
                tracing::warn!("Registration failed: username already exists");
                return Err(DomainError::validation(
                    "username: A user with that username already exists.",
                ));
            }
            Err(DomainError::UserNotFound) => {}
            Err(err) => return Err(err),
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Password hashing failed: {}", e);
                DomainError::InternalError(format!("Password hashing failed: {}", e))
            })?
            .to_string();

        let email = req.email.as_deref().filter(|email| !email.is_empty());
        let user = self
            .user_repo
            .create(&req.username, email, &password_hash)
            .await?;

        tracing::info!(
            "User registered successfully: id={}, username={}",
            user.id,
            user.username
        );

        Ok(UserResponse::from(user))
    }

    /// Exchanges credentials for an access token.
    pub async fn obtain_token(&self, req: LoginUserRequest) -> Result<String, DomainError> {
        tracing::debug!("Issuing token for username: {}", req.username);

        let user = match self.user_repo.find_by_username(&req.username).await {
            Ok(user) => user,
            Err(DomainError::UserNotFound) => {
                tracing::warn!("Unknown username: {}", req.username);
                return Err(DomainError::InvalidCredentials);
            }
            Err(err) => return Err(err),
        };

        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            tracing::error!("Invalid password hash format: {}", e);
            DomainError::InternalError(format!("Invalid password hash: {}", e))
        })?;

        if Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            tracing::warn!("Invalid password for user {}", user.username);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self
            .jwt_service
            .generate_token(user.id, user.username.clone())?;

        tracing::info!(
            "Token issued: id={}, username={}",
            user.id,
            user.username
        );

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<i64, DomainError> {
        self.jwt_service.verify_token(token).map_err(|e| {
            tracing::warn!("Token validation failed: {:?}", e);
            DomainError::Unauthorized("Token is invalid or expired".to_string())
        })
    }
}

fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.is_empty() {
        return Err(DomainError::validation("username: This field may not be blank."));
    }
    if username.chars().count() > 150 {
        return Err(DomainError::validation(
            "username: Ensure this field has no more than 150 characters.",
        ));
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(DomainError::validation(
            "username: Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }
    Ok(())
}
