use crate::domain::{LikeToggle, NewPost, NewUser, Post, PostChanges, PostComment, User, UserChanges};
use crate::error::{AppError, Result};
use crate::repository::{PostStore, UserStore};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

const POST_COLUMNS: &str =
    "id, user_id, description, img, likes, comments, mentions, created_at, updated_at";

/// Map unique violations on the users table to `Conflict`
fn map_user_write_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return match db_err.constraint() {
                Some("users_username_key") => AppError::Conflict("Username already exists".into()),
                _ => AppError::Conflict("Email already exists".into()),
            };
        }
    }
    AppError::Database(err)
}

/// PostgreSQL-backed identity store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgUserStore {
    async fn insert_user(&self, user: NewUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                email = COALESCE($3, email),
                password = COALESCE($4, password),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_write_error)?;

        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn add_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET followings = array_append(followings, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(followings))
            "#,
        )
        .bind(user_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        debug!(%user_id, %followee_id, added = affected > 0, "add_following");
        Ok(affected > 0)
    }

    async fn remove_following(&self, user_id: Uuid, followee_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET followings = array_remove(followings, $2), updated_at = NOW()
            WHERE id = $1 AND $2 = ANY(followings)
            "#,
        )
        .bind(user_id)
        .bind(followee_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn add_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET followers = array_append(followers, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(followers))
            "#,
        )
        .bind(user_id)
        .bind(follower_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }

    async fn remove_follower(&self, user_id: Uuid, follower_id: Uuid) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE users
            SET followers = array_remove(followers, $2), updated_at = NOW()
            WHERE id = $1 AND $2 = ANY(followers)
            "#,
        )
        .bind(user_id)
        .bind(follower_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(affected > 0)
    }
}

/// Row shape of the posts table
#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    description: Option<String>,
    img: Option<String>,
    likes: Vec<Uuid>,
    comments: Json<Vec<PostComment>>,
    mentions: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            user_id: row.user_id,
            desc: row.description,
            img: row.img,
            likes: row.likes,
            comments: row.comments.0,
            mentions: row.mentions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL-backed content store
#[derive(Clone)]
pub struct PgPostStore {
    pool: PgPool,
}

impl PgPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PostStore for PgPostStore {
    async fn insert_post(&self, post: NewPost) -> Result<Post> {
        let query = format!(
            r#"
            INSERT INTO posts (id, user_id, description, img, mentions)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(Uuid::new_v4())
            .bind(post.user_id)
            .bind(&post.desc)
            .bind(&post.img)
            .bind(&post.mentions)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>> {
        let query = format!("SELECT {} FROM posts WHERE id = $1", POST_COLUMNS);

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    async fn list_posts(&self) -> Result<Vec<Post>> {
        let query = format!(
            "SELECT {} FROM posts ORDER BY created_at DESC",
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn list_posts_by_user(&self, user_id: Uuid) -> Result<Vec<Post>> {
        let query = format!(
            "SELECT {} FROM posts WHERE user_id = $1 ORDER BY created_at DESC",
            POST_COLUMNS
        );

        let rows = sqlx::query_as::<_, PostRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn update_post(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>> {
        let query = format!(
            r#"
            UPDATE posts
            SET description = $2,
                img = COALESCE($3, img),
                mentions = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(id)
            .bind(&changes.desc)
            .bind(&changes.img)
            .bind(&changes.mentions)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    async fn toggle_like(&self, post_id: Uuid, user_id: Uuid) -> Result<Option<LikeToggle>> {
        // The row lock taken by UPDATE serializes concurrent toggles on one post.
        let liked: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE posts
            SET likes = CASE
                    WHEN $2 = ANY(likes) THEN array_remove(likes, $2)
                    ELSE array_append(likes, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING $2 = ANY(likes)
            "#,
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(liked.map(|now_liked| {
            if now_liked {
                LikeToggle::Liked
            } else {
                LikeToggle::Unliked
            }
        }))
    }

    async fn push_comment(&self, post_id: Uuid, comment: PostComment) -> Result<Option<Post>> {
        let query = format!(
            r#"
            UPDATE posts
            SET comments = comments || $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            POST_COLUMNS
        );

        let row = sqlx::query_as::<_, PostRow>(&query)
            .bind(post_id)
            .bind(Json(vec![comment]))
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Post::from))
    }
}
