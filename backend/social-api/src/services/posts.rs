use crate::domain::{NewPost, Post, PostChanges};
use crate::error::{AppError, Result};
use crate::repository::PostStore;
use crate::services::MentionResolver;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Post lifecycle: create, update, list, delete
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    mentions: MentionResolver,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, mentions: MentionResolver) -> Self {
        Self { posts, mentions }
    }

    pub async fn create(&self, user_id: Uuid, desc: String, img: Option<String>) -> Result<Post> {
        let mentions = self.mentions.resolve(Some(&desc)).await?;

        let post = self
            .posts
            .insert_post(NewPost {
                user_id,
                desc,
                img,
                mentions,
            })
            .await?;

        info!(
            post_id = %post.id,
            user_id = %user_id,
            mention_count = post.mentions.len(),
            "post created"
        );
        Ok(post)
    }

    /// Replace the description and re-resolve mentions from it
    pub async fn update(&self, post_id: Uuid, desc: String, img: Option<String>) -> Result<Post> {
        let mentions = self.mentions.resolve(Some(&desc)).await?;

        self.posts
            .update_post(post_id, PostChanges { desc, img, mentions })
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    /// All posts, newest first
    pub async fn list(&self) -> Result<Vec<Post>> {
        self.posts.list_posts().await
    }

    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        self.posts.list_posts_by_user(user_id).await
    }

    /// Delete a post on behalf of its author
    pub async fn delete(&self, post_id: Uuid, acting_user_id: Uuid) -> Result<()> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        if post.user_id != acting_user_id {
            return Err(AppError::Forbidden(
                "You can only delete your own posts".into(),
            ));
        }

        self.posts.delete_post(post_id).await?;
        info!(%post_id, user_id = %acting_user_id, "post deleted");
        Ok(())
    }
}
