/// Profile and follow-graph handlers
use crate::error::{AppError, Result};
use crate::services::ProfileUpdate;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Body naming the acting user, as sent by the follow/unfollow routes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActingUserRequest {
    pub user_id: Option<Uuid>,
}

impl ActingUserRequest {
    pub fn require(&self) -> Result<Uuid> {
        self.user_id
            .ok_or_else(|| AppError::Validation("userId is required".into()))
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub is_admin: bool,
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: Option<String>,
    #[validate(email(message = "email must be a valid address"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

pub async fn list_users(state: web::Data<AppState>) -> Result<HttpResponse> {
    let users = state.profiles.list().await?;
    Ok(HttpResponse::Ok().json(users))
}

pub async fn get_user(state: web::Data<AppState>, path: web::Path<Uuid>) -> Result<HttpResponse> {
    let user = state.profiles.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "user": user })))
}

/// The path id stays a string here: this is the one route that reports a
/// malformed id as 400.
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let update = ProfileUpdate {
        username: req.username,
        email: req.email,
        password: req.password,
    };
    let user = state
        .profiles
        .update(&path, req.user_id, req.is_admin, update)
        .await?;

    Ok(HttpResponse::Ok().json(user))
}

pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    state.profiles.delete(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User deleted successfully" })))
}

pub async fn follow(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActingUserRequest>,
) -> Result<HttpResponse> {
    state.follows.follow(req.require()?, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User followed successfully" })))
}

pub async fn unfollow(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActingUserRequest>,
) -> Result<HttpResponse> {
    state
        .follows
        .unfollow(req.require()?, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "User unfollowed successfully" })))
}
