use crate::domain::{User, UserChanges};
use crate::error::{AppError, Result};
use crate::repository::UserStore;
use crate::security::hash_password;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Requested profile changes; the password is plaintext here
#[derive(Debug, Default)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn get(&self, id: Uuid) -> Result<User> {
        self.users
            .find_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// All users, newest first
    pub async fn list(&self) -> Result<Vec<User>> {
        self.users.list_users().await
    }

    /// Update the profile at `target_id`.
    ///
    /// Allowed when the acting user is the target or claims admin. `target_id` is
    /// the raw path segment and is validated here.
    pub async fn update(
        &self,
        target_id: &str,
        acting_user_id: Option<Uuid>,
        is_admin: bool,
        update: ProfileUpdate,
    ) -> Result<User> {
        let target = Uuid::parse_str(target_id).ok();

        let is_self = matches!((target, acting_user_id), (Some(t), Some(a)) if t == a);
        if !is_self && !is_admin {
            return Err(AppError::Forbidden(
                "Not authorized to update this user".into(),
            ));
        }

        let target =
            target.ok_or_else(|| AppError::Validation("Invalid user ID format".into()))?;

        let password = update
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;

        let changes = UserChanges {
            username: update.username,
            email: update.email,
            password,
        };

        let user = self
            .users
            .update_user(target, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if !self.users.delete_user(id).await? {
            return Err(AppError::NotFound("User not found".into()));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewUser;
    use crate::repository::MemoryStore;
    use crate::security::verify_password;

    async fn setup() -> (ProfileService, User) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(NewUser {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "hash".into(),
            })
            .await
            .unwrap();
        (ProfileService::new(store), user)
    }

    #[tokio::test]
    async fn test_update_own_profile_rehashes_password() {
        let (service, user) = setup().await;

        let updated = service
            .update(
                &user.id.to_string(),
                Some(user.id),
                false,
                ProfileUpdate {
                    username: Some("alice_b".into()),
                    password: Some("new-secret".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.username, "alice_b");
        assert_eq!(updated.email, "alice@example.com");
        assert!(verify_password("new-secret", &updated.password).unwrap());
    }

    #[tokio::test]
    async fn test_update_someone_else_is_forbidden() {
        let (service, user) = setup().await;
        let err = service
            .update(
                &user.id.to_string(),
                Some(Uuid::new_v4()),
                false,
                ProfileUpdate::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_update_bad_id_format() {
        let (service, _) = setup().await;
        let err = service
            .update("not-an-id", None, true, ProfileUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg == "Invalid user ID format"));
    }

    #[tokio::test]
    async fn test_admin_update_of_missing_user() {
        let (service, _) = setup().await;
        let err = service
            .update(
                &Uuid::new_v4().to_string(),
                None,
                true,
                ProfileUpdate::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let (service, user) = setup().await;
        service.delete(user.id).await.unwrap();
        assert!(matches!(
            service.delete(user.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.get(user.id).await, Err(AppError::NotFound(_))));
    }
}
