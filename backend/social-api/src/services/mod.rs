pub mod auth;
pub mod engagement;
pub mod follow;
pub mod mention_resolver;
pub mod posts;
pub mod profile;

pub use auth::{AuthService, AuthSession};
pub use engagement::EngagementService;
pub use follow::FollowService;
pub use mention_resolver::{extract_mentions, MentionResolver};
pub use posts::PostService;
pub use profile::{ProfileService, ProfileUpdate};
