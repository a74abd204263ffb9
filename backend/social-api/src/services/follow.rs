use crate::error::{AppError, Result};
use crate::repository::UserStore;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Maintains follow edges, stored on both users: the follower's `followings`
/// and the followee's `followers`.
#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserStore>,
}

impl FollowService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    async fn ensure_both_exist(&self, a: Uuid, b: Uuid) -> Result<()> {
        let first = self.users.find_user(a).await?;
        let second = self.users.find_user(b).await?;
        if first.is_none() || second.is_none() {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }

    /// Make `current_user_id` follow `target_user_id`.
    pub async fn follow(&self, current_user_id: Uuid, target_user_id: Uuid) -> Result<()> {
        if current_user_id == target_user_id {
            return Err(AppError::InvalidRequest("You can't follow yourself".into()));
        }

        self.ensure_both_exist(current_user_id, target_user_id)
            .await?;

        if !self
            .users
            .add_following(current_user_id, target_user_id)
            .await?
        {
            return Err(AppError::Conflict("You already follow this user".into()));
        }

        // `false` is fine when the follower is already recorded, but not when the
        // target was deleted after the existence check.
        let failure = match self
            .users
            .add_follower(target_user_id, current_user_id)
            .await
        {
            Ok(true) => None,
            Ok(false) => match self.users.find_user(target_user_id).await {
                Ok(Some(_)) => None,
                Ok(None) => Some(AppError::NotFound("User not found".into())),
                Err(e) => Some(e),
            },
            Err(e) => Some(e),
        };

        if let Some(e) = failure {
            error!(
                follower_id = %current_user_id,
                followee_id = %target_user_id,
                error = %e,
                "follow: followers update failed, undoing followings update"
            );
            self.compensate(
                self.users.remove_following(current_user_id, target_user_id).await,
                current_user_id,
                target_user_id,
            );
            return Err(e);
        }

        info!(
            follower_id = %current_user_id,
            followee_id = %target_user_id,
            "user followed"
        );
        Ok(())
    }

    /// Remove the edge `current_user_id` -> `target_user_id`.
    pub async fn unfollow(&self, current_user_id: Uuid, target_user_id: Uuid) -> Result<()> {
        self.ensure_both_exist(current_user_id, target_user_id)
            .await?;

        if !self
            .users
            .remove_following(current_user_id, target_user_id)
            .await?
        {
            return Err(AppError::InvalidRequest(
                "You are not following this user".into(),
            ));
        }

        if let Err(e) = self
            .users
            .remove_follower(target_user_id, current_user_id)
            .await
        {
            error!(
                follower_id = %current_user_id,
                followee_id = %target_user_id,
                error = %e,
                "unfollow: followers update failed, restoring followings entry"
            );
            self.compensate(
                self.users.add_following(current_user_id, target_user_id).await,
                current_user_id,
                target_user_id,
            );
            return Err(e);
        }

        info!(
            follower_id = %current_user_id,
            followee_id = %target_user_id,
            "user unfollowed"
        );
        Ok(())
    }

    fn compensate(&self, outcome: Result<bool>, follower_id: Uuid, followee_id: Uuid) {
        if let Err(e) = outcome {
            // Edge is now one-sided until the next follow/unfollow on this pair.
            warn!(
                %follower_id,
                %followee_id,
                error = %e,
                "compensating edge update failed"
            );
        }
    }
}
