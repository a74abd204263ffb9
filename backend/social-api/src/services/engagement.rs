use crate::domain::{Comment, LikeToggle, Post, PostComment, QuickComment};
use crate::error::{AppError, Result};
use crate::repository::{PostStore, UserStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Likes and comments on a single post
#[derive(Clone)]
pub struct EngagementService {
    posts: Arc<dyn PostStore>,
    users: Arc<dyn UserStore>,
}

impl EngagementService {
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    /// Like the post if `user_id` has not liked it yet, otherwise take the like back.
    pub async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<LikeToggle> {
        let outcome = self
            .posts
            .toggle_like(post_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))?;

        info!(%post_id, %user_id, ?outcome, "like toggled");
        Ok(outcome)
    }

    /// Append a comment by an existing user, snapshotting their username.
    pub async fn add_comment(&self, post_id: Uuid, author_id: Uuid, text: String) -> Result<Post> {
        let author = self
            .users
            .find_user(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        // Checked up front so a missing post is reported before anything is built.
        if self.posts.find_post(post_id).await?.is_none() {
            return Err(AppError::NotFound("Post not found".into()));
        }

        let comment = PostComment::Authored(Comment {
            user_id: author.id,
            username: author.username,
            text,
            created_at: Utc::now(),
        });

        // The post can disappear between the check and the append.
        self.posts
            .push_comment(post_id, comment)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }

    /// Legacy comment path: stores `{userId, comment}` as given, without checking
    /// that the user exists.
    pub async fn append_quick_comment(
        &self,
        post_id: Uuid,
        user_id: Uuid,
        comment: String,
    ) -> Result<Post> {
        let comment = PostComment::Quick(QuickComment { user_id, comment });

        self.posts
            .push_comment(post_id, comment)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewPost, NewUser};
    use crate::repository::MemoryStore;

    async fn setup() -> (EngagementService, Arc<MemoryStore>, Uuid, Uuid) {
        let store = Arc::new(MemoryStore::new());
        let user = store
            .insert_user(NewUser {
                username: "alice".into(),
                email: "alice@example.com".into(),
                password: "hash".into(),
            })
            .await
            .unwrap();
        let post = store
            .insert_post(NewPost {
                user_id: user.id,
                desc: "first post".into(),
                img: None,
                mentions: vec![],
            })
            .await
            .unwrap();

        let service = EngagementService::new(store.clone(), store.clone());
        (service, store, user.id, post.id)
    }

    #[tokio::test]
    async fn test_toggle_like_is_an_involution() {
        let (service, store, user_id, post_id) = setup().await;

        assert_eq!(
            service.toggle_like(post_id, user_id).await.unwrap(),
            LikeToggle::Liked
        );
        assert_eq!(store.find_post(post_id).await.unwrap().unwrap().likes, vec![user_id]);

        assert_eq!(
            service.toggle_like(post_id, user_id).await.unwrap(),
            LikeToggle::Unliked
        );
        assert!(store.find_post(post_id).await.unwrap().unwrap().likes.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_like_missing_post() {
        let (service, _, user_id, _) = setup().await;
        let err = service.toggle_like(Uuid::new_v4(), user_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_likes_never_duplicate() {
        let (service, store, _, post_id) = setup().await;
        let likers: Vec<Uuid> = (0..32).map(|_| Uuid::new_v4()).collect();

        let mut handles = Vec::new();
        for user_id in likers.clone() {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.toggle_like(post_id, user_id).await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), LikeToggle::Liked);
        }

        let mut likes = store.find_post(post_id).await.unwrap().unwrap().likes;
        likes.sort();
        let mut expected = likers;
        expected.sort();
        assert_eq!(likes, expected);
    }

    #[tokio::test]
    async fn test_add_comment_snapshots_username() {
        let (service, _, user_id, post_id) = setup().await;

        let post = service
            .add_comment(post_id, user_id, "hi".into())
            .await
            .unwrap();

        assert_eq!(post.comments.len(), 1);
        match &post.comments[0] {
            PostComment::Authored(c) => {
                assert_eq!(c.user_id, user_id);
                assert_eq!(c.username, "alice");
                assert_eq!(c.text, "hi");
            }
            other => panic!("unexpected comment shape: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_comment_unknown_user_leaves_post_untouched() {
        let (service, store, _, post_id) = setup().await;

        let err = service
            .add_comment(post_id, Uuid::new_v4(), "hi".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(msg) if msg == "User not found"));
        assert!(store.find_post(post_id).await.unwrap().unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn test_add_comment_unknown_post() {
        let (service, _, user_id, _) = setup().await;
        let err = service
            .add_comment(Uuid::new_v4(), user_id, "hi".into())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Post not found"));
    }

    #[tokio::test]
    async fn test_quick_comment_skips_author_check() {
        let (service, _, _, post_id) = setup().await;
        let stranger = Uuid::new_v4();

        let post = service
            .append_quick_comment(post_id, stranger, "+1".into())
            .await
            .unwrap();

        assert_eq!(
            post.comments,
            vec![PostComment::Quick(QuickComment {
                user_id: stranger,
                comment: "+1".into()
            })]
        );
    }
}
