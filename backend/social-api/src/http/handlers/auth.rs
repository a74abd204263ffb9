/// Registration, login and token handlers
use crate::error::Result;
use crate::http::middleware::AuthenticatedUser;
use crate::state::AppState;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 64, message = "username must be 1-64 characters"))]
    pub username: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<RegisterRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = req.into_inner();

    let session = state.auth.register(username, email, &password).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({
        "user": session.user,
        "token": session.token,
    })))
}

pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<CredentialsRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let session = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Login successful",
        "user": session.user,
        "token": session.token,
    })))
}

/// Same credential check as login, answering with the token only
pub async fn generate_token(
    state: web::Data<AppState>,
    req: web::Json<CredentialsRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let session = state.auth.login(&req.email, &req.password).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "token": session.token })))
}

pub async fn protected(user: AuthenticatedUser) -> HttpResponse {
    tracing::debug!(user_id = %user.0, "protected route accessed");
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Access granted to protected route",
    }))
}
