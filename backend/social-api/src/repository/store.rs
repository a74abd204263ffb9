use crate::domain::{LikeToggle, NewPost, NewUser, Post, PostChanges, PostComment, User, UserChanges};
use crate::error::Result;
use uuid::Uuid;

/// Identity store: the `users` collection.
///
/// Follow-edge methods are single atomic set operations on one document. They report
/// whether the document changed and never read-modify-write.
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. Fails with `Conflict` when email or username is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Exact, case-sensitive username match
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// All users, newest first
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Apply profile changes. Returns `None` when the user does not exist.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>>;

    /// Returns true if a user was removed
    async fn delete_user(&self, id: Uuid) -> Result<bool>;

    /// Add `followee_id` to `user_id`'s followings unless already present
    async fn add_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool>;

    /// Remove `followee_id` from `user_id`'s followings if present
    async fn remove_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool>;

    /// Add `follower_id` to `user_id`'s followers unless already present
    async fn add_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool>;

    /// Remove `follower_id` from `user_id`'s followers if present
    async fn remove_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool>;
}

/// Content store: the `posts` collection.
#[async_trait::async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: NewPost) -> Result<Post>;

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<Post>>;

    /// Posts by one author, newest first
    async fn list_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>>;

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>>;

    async fn delete_post(&self, id: Uuid) -> Result<bool>;

    /// Flip `user_id`'s membership in the post's like set in one atomic update.
    /// Returns `None` when the post does not exist.
    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<LikeToggle>>;

    /// Append to the post's comment sequence in one atomic update.
    /// Returns `None` when the post does not exist.
    async fn push_comment(&self, post_id: Uuid, comment: PostComment) -> Result<Option<Post>>;
}
