//! Authentication service: credential checks and access token handling.

use domain::models::{AuthUser, Role};
use domain::store::UserStore;
use domain::StoreError;
use shared::jwt::{extract_organization_id, extract_user_id, JwtConfig, JwtError, TokenSubject};
use shared::password::{verify_against_dummy, verify_password, PasswordError};
use shared::validation::normalize_email;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token error: {0}")]
    TokenError(JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl From<JwtError> for AuthError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenExpired => AuthError::TokenExpired,
            JwtError::InvalidToken | JwtError::DecodingError(_) => AuthError::InvalidToken,
            other => AuthError::TokenError(other),
        }
    }
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub access_token: String,
    pub expires_in: i64,
    pub user: AuthUser,
}

/// Authentication service.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt: Arc<JwtConfig>) -> Self {
        Self { users, jwt }
    }

    /// Checks an email/password pair and issues an access token.
    ///
    /// Unknown emails and wrong passwords fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_against_dummy(password);
            info!("Login failed: unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        let valid = match verify_password(password, &user.password_hash) {
            Ok(valid) => valid,
            Err(PasswordError::InvalidHashFormat) => {
                warn!(user_id = %user.id, "Stored password hash is not a valid PHC string");
                false
            }
            Err(e) => return Err(e.into()),
        };

        if !valid {
            info!(user_id = %user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, jti) = self.jwt.generate_access_token(TokenSubject {
            user_id: user.id,
            email: &user.email,
            role: user.role.as_str(),
            organization_id: user.organization_id,
        })?;

        info!(user_id = %user.id, jti = %jti, "User logged in");

        Ok(LoginResult {
            access_token,
            expires_in: self.jwt.access_token_expiry_secs,
            user: user.auth_user(),
        })
    }

    /// Validates an access token and returns the identity it carries.
    pub fn verify(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.jwt.validate_access_token(token)?;

        let role = Role::from_str(&claims.role).map_err(|_| AuthError::InvalidToken)?;
        let id = extract_user_id(&claims)?;
        let organization_id = extract_organization_id(&claims)?;

        Ok(AuthUser {
            id,
            email: claims.email,
            role,
            organization_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{NewOrganization, NewUser};
    use domain::store::Stores;
    use persistence::MemoryStore;
    use shared::password::hash_password;

    async fn service_with_user(role: Role) -> (AuthService, Stores) {
        let stores = MemoryStore::new().into_stores();
        let org = stores
            .organizations
            .create(NewOrganization {
                name: "org-1".into(),
                parent_id: None,
            })
            .await
            .unwrap();
        stores
            .users
            .create(NewUser {
                email: "owner@example.com".into(),
                password_hash: hash_password("password123").unwrap(),
                role,
                organization_id: org.id,
            })
            .await
            .unwrap();

        let jwt = JwtConfig::with_secret("unit-test-secret", 900, 0).unwrap();
        (
            AuthService::new(stores.users.clone(), Arc::new(jwt)),
            stores,
        )
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let (service, _) = service_with_user(Role::Owner).await;

        let result = service
            .login(" Owner@Example.com ", "password123")
            .await
            .unwrap();
        assert_eq!(result.expires_in, 900);
        assert_eq!(result.user.role, Role::Owner);

        let identity = service.verify(&result.access_token).unwrap();
        assert_eq!(identity, result.user);
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let (service, _) = service_with_user(Role::Viewer).await;

        let wrong = service.login("owner@example.com", "nope").await.unwrap_err();
        let unknown = service
            .login("nobody@example.com", "password123")
            .await
            .unwrap_err();

        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn test_plain_text_stored_password_is_rejected() {
        let stores = MemoryStore::new().into_stores();
        let org = stores
            .organizations
            .create(NewOrganization {
                name: "org-1".into(),
                parent_id: None,
            })
            .await
            .unwrap();
        stores
            .users
            .create(NewUser {
                email: "legacy@example.com".into(),
                password_hash: "password123".into(),
                role: Role::Admin,
                organization_id: org.id,
            })
            .await
            .unwrap();

        let jwt = JwtConfig::with_secret("unit-test-secret", 900, 0).unwrap();
        let service = AuthService::new(stores.users.clone(), Arc::new(jwt));

        let result = service.login("legacy@example.com", "password123").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_verify_rejects_foreign_and_expired_tokens() {
        let (service, _) = service_with_user(Role::Admin).await;

        let other = JwtConfig::with_secret("another-secret", 900, 0).unwrap();
        let (foreign, _) = other
            .generate_access_token(TokenSubject {
                user_id: uuid::Uuid::new_v4(),
                email: "x@example.com",
                role: "ADMIN",
                organization_id: uuid::Uuid::new_v4(),
            })
            .unwrap();
        assert!(matches!(
            service.verify(&foreign),
            Err(AuthError::InvalidToken)
        ));

        let expired_issuer = JwtConfig::with_secret("unit-test-secret", -120, 0).unwrap();
        let (expired, _) = expired_issuer
            .generate_access_token(TokenSubject {
                user_id: uuid::Uuid::new_v4(),
                email: "x@example.com",
                role: "ADMIN",
                organization_id: uuid::Uuid::new_v4(),
            })
            .unwrap();
        assert!(matches!(
            service.verify(&expired),
            Err(AuthError::TokenExpired)
        ));
    }

    #[tokio::test]
    async fn test_verify_rejects_unknown_role() {
        let (service, _) = service_with_user(Role::Admin).await;
        let issuer = JwtConfig::with_secret("unit-test-secret", 900, 0).unwrap();
        let (token, _) = issuer
            .generate_access_token(TokenSubject {
                user_id: uuid::Uuid::new_v4(),
                email: "x@example.com",
                role: "SUPERUSER",
                organization_id: uuid::Uuid::new_v4(),
            })
            .unwrap();

        assert!(matches!(service.verify(&token), Err(AuthError::InvalidToken)));
    }
}
