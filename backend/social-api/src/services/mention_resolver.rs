//! Mention Resolver
//!
//! Extracts @mentions from post text and resolves them to user ids.

use crate::error::Result;
use crate::repository::UserStore;
use regex::Regex;
use std::sync::{Arc, LazyLock};
use uuid::Uuid;

/// `@` followed by a maximal run of ASCII word characters
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_]+)").expect("Invalid mention regex"));

/// Extract @mentions from content text
///
/// Returns handles (without the @ symbol) in order of appearance. Case and
/// duplicates are preserved.
///
/// # Examples
/// ```
/// use social_api::services::extract_mentions;
///
/// let mentions = extract_mentions("Hey @alice and @bob, @alice again");
/// assert_eq!(mentions, vec!["alice", "bob", "alice"]);
/// ```
pub fn extract_mentions(content: &str) -> Vec<&str> {
    MENTION_REGEX
        .captures_iter(content)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

#[derive(Clone)]
pub struct MentionResolver {
    users: Arc<dyn UserStore>,
}

impl MentionResolver {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Resolve every @handle in `text` to a user id.
    ///
    /// Handles with no exact username match are dropped. One lookup is issued per
    /// occurrence, so a handle mentioned twice resolves twice.
    pub async fn resolve(&self, text: Option<&str>) -> Result<Vec<Uuid>> {
        let Some(text) = text else {
            return Ok(Vec::new());
        };

        let mut ids = Vec::new();
        for handle in extract_mentions(text) {
            if let Some(user) = self.users.find_by_username(handle).await? {
                ids.push(user.id);
            }
        }

        Ok(ids)
    }
}
