use crate::domain::{NewUser, User};
use crate::error::{AppError, Result};
use crate::repository::UserStore;
use crate::security::{hash_password, verify_password, Claims, JwtKeys};
use std::sync::Arc;
use tracing::info;

/// A user together with a freshly signed access token
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

/// Registration, email/password checks and token issuing
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: Arc<JwtKeys>,
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid email or password".into())
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    pub async fn register(
        &self,
        username: String,
        email: String,
        password: &str,
    ) -> Result<AuthSession> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already exists".into()));
        }

        let password = hash_password(password)?;
        let user = self
            .users
            .insert_user(NewUser {
                username,
                email,
                password,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "user registered");

        let token = self.keys.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    /// Check an email/password pair and sign a token for the matching user.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(password, &user.password)? {
            return Err(invalid_credentials());
        }

        let token = self.keys.issue(&user)?;
        Ok(AuthSession { user, token })
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.keys.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::repository::MemoryStore;

    fn service() -> AuthService {
        let keys = JwtKeys::new(&AuthConfig {
            access_token_secret: "test-secret".into(),
            access_token_ttl_secs: 3600,
        });
        AuthService::new(Arc::new(MemoryStore::new()), Arc::new(keys))
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let auth = service();
        let registered = auth
            .register("alice".into(), "alice@example.com".into(), "hunter2")
            .await
            .unwrap();
        assert_ne!(registered.user.password, "hunter2");

        let session = auth.login("alice@example.com", "hunter2").await.unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let claims = auth.verify(&session.token).unwrap();
        assert_eq!(claims.user_id().unwrap(), registered.user.id);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let auth = service();
        auth.register("alice".into(), "alice@example.com".into(), "pw")
            .await
            .unwrap();

        let err = auth
            .register("alice2".into(), "alice@example.com".into(), "pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(msg) if msg == "Email already exists"));
    }

    #[tokio::test]
    async fn test_login_failures_look_the_same() {
        let auth = service();
        auth.register("alice".into(), "alice@example.com".into(), "hunter2")
            .await
            .unwrap();

        let wrong_password = auth.login("alice@example.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("bob@example.com", "hunter2").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AppError::Unauthorized(_)));
    }
}
