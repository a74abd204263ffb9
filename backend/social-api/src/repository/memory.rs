//! In-process store
//!
//! Backs both collections with `DashMap`s. Each mutation runs under the shard lock of
//! the document it touches, which gives the same per-document atomicity as the
//! PostgreSQL store. Used by the test suites and by `STORE_BACKEND=memory`.

use crate::domain::{LikeToggle, NewPost, NewUser, Post, PostChanges, PostComment, User, UserChanges};
use crate::error::{AppError, Result};
use crate::repository::{PostStore, UserStore};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    posts: DashMap<Uuid, Post>,
    /// Held while checking and writing unique user fields
    unique_users: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_unique(
        &self,
        id: Option<Uuid>,
        username: Option<&str>,
        email: Option<&str>,
    ) -> Result<()> {
        for entry in self.users.iter() {
            if Some(entry.id) == id {
                continue;
            }
            if email.is_some_and(|e| e == entry.email) {
                return Err(AppError::Conflict("Email already exists".into()));
            }
            if username.is_some_and(|u| u == entry.username) {
                return Err(AppError::Conflict("Username already exists".into()));
            }
        }
        Ok(())
    }

    fn lock_unique(&self) -> Result<std::sync::MutexGuard<'_, ()>> {
        self.unique_users
            .lock()
            .map_err(|_| AppError::Internal("user index lock poisoned".into()))
    }

    /// Run `f` on one user's edge list under its shard lock
    fn edit_edges<F>(&self, user_id: Uuid, f: F) -> bool
    where
        F: FnOnce(&mut User) -> bool,
    {
        match self.users.get_mut(&user_id) {
            Some(mut user) => {
                let changed = f(&mut *user);
                if changed {
                    user.updated_at = Utc::now();
                }
                changed
            }
            None => false,
        }
    }
}

fn add_to_set(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    if set.contains(&id) {
        return false;
    }
    set.push(id);
    true
}

fn remove_from_set(set: &mut Vec<Uuid>, id: Uuid) -> bool {
    let before = set.len();
    set.retain(|existing| *existing != id);
    set.len() != before
}

fn newest_first<T, F>(mut items: Vec<T>, created: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    items.sort_by_key(|item| std::cmp::Reverse(created(item)));
    items
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let _guard = self.lock_unique()?;
        self.check_unique(None, Some(&user.username), Some(&user.email))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password: user.password,
            is_admin: false,
            followers: Vec::new(),
            followings: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        Ok(newest_first(users, |u: &User| u.created_at))
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let _guard = self.lock_unique()?;
        if !self.users.contains_key(&id) {
            return Ok(None);
        }
        self.check_unique(
            Some(id),
            changes.username.as_deref(),
            changes.email.as_deref(),
        )?;

        Ok(self.users.get_mut(&id).map(|mut user| {
            if let Some(username) = changes.username {
                user.username = username;
            }
            if let Some(email) = changes.email {
                user.email = email;
            }
            if let Some(password) = changes.password {
                user.password = password;
            }
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        Ok(self.users.remove(&id).is_some())
    }

    async fn add_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.edit_edges(user_id, |u| add_to_set(&mut u.followings, followee_id)))
    }

    async fn remove_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool> {
        Ok(self.edit_edges(user_id, |u| remove_from_set(&mut u.followings, followee_id)))
    }

    async fn add_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool> {
        Ok(self.edit_edges(user_id, |u| add_to_set(&mut u.followers, follower_id)))
    }

    async fn remove_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool> {
        Ok(self.edit_edges(user_id, |u| remove_from_set(&mut u.followers, follower_id)))
    }
}

#[async_trait::async_trait]
impl PostStore for MemoryStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id: post.user_id,
            desc: Some(post.desc),
            img: post.img,
            likes: Vec::new(),
            comments: Vec::new(),
            mentions: post.mentions,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let posts: Vec<Post> = self.posts.iter().map(|p| p.clone()).collect();
        Ok(newest_first(posts, |p: &Post| p.created_at))
    }

    async fn list_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.clone())
            .collect();
        Ok(newest_first(posts, |p: &Post| p.created_at))
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(&id).map(|mut post| {
            post.desc = Some(changes.desc);
            if let Some(img) = changes.img {
                post.img = Some(img);
            }
            post.mentions = changes.mentions;
            post.updated_at = Utc::now();
            post.clone()
        }))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<LikeToggle>> {
        Ok(self.posts.get_mut(&post_id).map(|mut post| {
            post.updated_at = Utc::now();
            if remove_from_set(&mut post.likes, user_id) {
                LikeToggle::Unliked
            } else {
                post.likes.push(user_id);
                LikeToggle::Liked
            }
        }))
    }

    async fn push_comment(&self, post_id: Uuid, comment: PostComment) -> Result<Option<Post>> {
        Ok(self.posts.get_mut(&post_id).map(|mut post| {
            post.comments.push(comment);
            post.updated_at = Utc::now();
            post.clone()
        }))
    }
}
