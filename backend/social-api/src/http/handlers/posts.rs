/// Post handlers - CRUD, likes and comments
use crate::error::{AppError, Result};
use crate::http::handlers::users::ActingUserRequest;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub user_id: Option<Uuid>,
    #[validate(length(max = 5000, message = "desc must be at most 5000 characters"))]
    pub desc: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(max = 5000, message = "desc must be at most 5000 characters"))]
    pub desc: Option<String>,
    pub img: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    pub user_id: Option<Uuid>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickCommentRequest {
    pub user_id: Option<Uuid>,
    pub comment: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub async fn create_post(
    state: web::Data<AppState>,
    req: web::Json<CreatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let (Some(user_id), Some(desc)) = (req.user_id, non_empty(req.desc)) else {
        return Err(AppError::Validation("userId and desc are required".into()));
    };

    let post = state.posts.create(user_id, desc, req.img).await?;
    Ok(HttpResponse::Created().json(post))
}

pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let req = req.into_inner();

    let desc = non_empty(req.desc)
        .ok_or_else(|| AppError::Validation("Description (desc) is required".into()))?;

    let post = state.posts.update(path.into_inner(), desc, req.img).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Every failure on this route is reported as 400, a malformed post id included.
pub async fn toggle_like(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<ActingUserRequest>,
) -> Result<HttpResponse> {
    let post_id = Uuid::parse_str(&path)
        .map_err(|_| AppError::InvalidRequest("Invalid post ID format".into()))?;
    let user_id = req.require().map_err(AppError::into_bad_request)?;

    let outcome = state
        .engagement
        .toggle_like(post_id, user_id)
        .await
        .map_err(AppError::into_bad_request)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": outcome.message() })))
}

/// Missing text is stored as an empty comment; only the author and post are checked.
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<AddCommentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let author_id = req
        .user_id
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;
    let text = req.text.unwrap_or_default();

    let post = state
        .engagement
        .add_comment(path.into_inner(), author_id, text)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Legacy comment route, kept for existing clients
pub async fn quick_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<QuickCommentRequest>,
) -> Result<HttpResponse> {
    let req = req.into_inner();
    let (Some(user_id), Some(comment)) = (req.user_id, non_empty(req.comment)) else {
        return Err(AppError::Validation("UserId and comment are required".into()));
    };

    let post = state
        .engagement
        .append_quick_comment(path.into_inner(), user_id, comment)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Comment added successfully",
        "post": post,
    })))
}

pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    req: web::Json<ActingUserRequest>,
) -> Result<HttpResponse> {
    state
        .posts
        .delete(path.into_inner(), req.require()?)
        .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Post deleted successfully" })))
}

pub async fn list_posts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let posts = state.posts.list().await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn list_user_posts(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let posts = state.posts.list_by_user(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(posts))
}
