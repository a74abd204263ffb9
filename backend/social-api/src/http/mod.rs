pub mod handlers;
pub mod middleware;

use crate::error::AppError;
use crate::state::AppState;
use actix_web::web;
use handlers::{auth, posts, users};
use middleware::JwtAuth;

/// Register every route on the given service config.
///
/// `/api/users` is mounted ahead of `/api` so that `/api/{id}` never shadows it.
pub fn configure(cfg: &mut web::ServiceConfig, state: AppState) {
    let jwt = JwtAuth::new(state.auth.clone());

    cfg.app_data(web::Data::new(state))
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            AppError::Validation(format!("Invalid request body: {}", err)).into()
        }))
        .app_data(
            web::PathConfig::default()
                .error_handler(|_err, _req| AppError::NotFound("Not found".into()).into()),
        )
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/api/users")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/generateToken", web::post().to(auth::generate_token))
                .service(
                    web::resource("/protected")
                        .wrap(jwt.clone())
                        .route(web::get().to(auth::protected)),
                )
                .service(
                    web::resource("")
                        .wrap(jwt.clone())
                        .route(web::get().to(users::list_users)),
                )
                .service(
                    web::resource("/{id}")
                        .wrap(jwt.clone())
                        .route(web::put().to(users::update_user))
                        .route(web::delete().to(users::delete_user)),
                ),
        )
        .service(
            web::scope("/api")
                .wrap(jwt)
                .route("", web::get().to(posts::list_posts))
                .route("/", web::get().to(posts::list_posts))
                .route("/post", web::post().to(posts::create_post))
                .route("/user/{id}", web::get().to(posts::list_user_posts))
                .route("/{id}/updatepost", web::post().to(posts::update_post))
                .route("/{id}/likes", web::put().to(posts::toggle_like))
                .route("/{id}/addcomments", web::put().to(posts::add_comment))
                .route("/{id}/comments", web::put().to(posts::quick_comment))
                .route("/{id}/follow", web::put().to(users::follow))
                .route("/{id}/unfollow", web::put().to(users::unfollow))
                .service(
                    web::resource("/{id}")
                        .route(web::get().to(users::get_user))
                        .route(web::delete().to(posts::delete_post)),
                ),
        );
}
