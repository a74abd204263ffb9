pub mod models;

pub use models::{
    Comment, LikeToggle, NewPost, NewUser, Post, PostChanges, PostComment, QuickComment, User,
    UserChanges,
};
