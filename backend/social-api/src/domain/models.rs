use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity - credentials plus both sides of the follow graph
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC string, never sent to clients
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub followers: Vec<Uuid>,
    pub followings: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a user. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Optional profile changes; `None` leaves the field untouched
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    /// Already hashed
    pub password: Option<String>,
}

/// Post entity
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    /// Author id; not enforced against the users collection
    pub user_id: Uuid,
    pub desc: Option<String>,
    pub img: Option<String>,
    pub likes: Vec<Uuid>,
    pub comments: Vec<PostComment>,
    pub mentions: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub desc: String,
    pub img: Option<String>,
    pub mentions: Vec<Uuid>,
}

/// Replacement content for a post; `img: None` keeps the current image
#[derive(Debug, Clone)]
pub struct PostChanges {
    pub desc: String,
    pub img: Option<String>,
    pub mentions: Vec<Uuid>,
}

/// Entry in a post's comment sequence.
///
/// Authored comments come from the validated path and carry a username snapshot.
/// Quick comments come from the legacy path and are stored as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostComment {
    Authored(Comment),
    Quick(QuickComment),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub user_id: Uuid,
    /// Author's username at the time the comment was written
    pub username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickComment {
    pub user_id: Uuid,
    pub comment: String,
}

/// Which branch a like toggle took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

impl LikeToggle {
    pub fn message(self) -> &'static str {
        match self {
            LikeToggle::Liked => "Post has been liked",
            LikeToggle::Unliked => "Post has been disliked",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_json_hides_password() {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "$argon2id$secret".into(),
            is_admin: false,
            followers: vec![],
            followings: vec![],
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["_id"], user.id.to_string());
        assert_eq!(json["isAdmin"], false);
    }

    #[test]
    fn test_comment_shapes_survive_storage() {
        let user_id = Uuid::new_v4();
        let comments = vec![
            PostComment::Authored(Comment {
                user_id,
                username: "alice".into(),
                text: "nice".into(),
                created_at: Utc::now(),
            }),
            PostComment::Quick(QuickComment {
                user_id,
                comment: "+1".into(),
            }),
        ];

        let stored = serde_json::to_string(&comments).unwrap();
        let loaded: Vec<PostComment> = serde_json::from_str(&stored).unwrap();

        assert_eq!(loaded, comments);
        assert!(matches!(loaded[1], PostComment::Quick(_)));
    }
}
