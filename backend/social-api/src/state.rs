use crate::repository::{PostStore, UserStore};
use crate::security::JwtKeys;
use crate::services::{
    AuthService, EngagementService, FollowService, MentionResolver, PostService, ProfileService,
};
use std::sync::Arc;

/// Services shared by every HTTP worker
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub profiles: ProfileService,
    pub posts: PostService,
    pub engagement: EngagementService,
    pub follows: FollowService,
}

impl AppState {
    pub fn new(users: Arc<dyn UserStore>, posts: Arc<dyn PostStore>, keys: Arc<JwtKeys>) -> Self {
        Self {
            auth: AuthService::new(users.clone(), keys),
            profiles: ProfileService::new(users.clone()),
            posts: PostService::new(posts.clone(), MentionResolver::new(users.clone())),
            engagement: EngagementService::new(posts, users.clone()),
            follows: FollowService::new(users),
        }
    }
}
