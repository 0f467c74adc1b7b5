//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod category;
mod comments;
mod health;
mod posts;
mod profile;

use actix_web::{HttpResponse, http::header, web};
use serde::Deserialize;
use uuid::Uuid;

use blogicum_core::domain::{Post, PostSummary, User};
use blogicum_core::pagination::Page;
use blogicum_shared::dto::{PageResponse, PostResponse, PostSummaryResponse, UserResponse};

/// Configure all application routes.
///
/// Within `/posts`, the static `create` segment must be registered before the
/// `{post_id}` pattern.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::feed))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                .route("/me", web::get().to(auth::me)),
        )
        .route("/create", web::get().to(posts::create_form))
        .route("/create", web::post().to(posts::create))
        .route("/edit_profile", web::get().to(profile::edit_form))
        .route("/edit_profile", web::post().to(profile::update))
        .route("/profile/{username}", web::get().to(profile::detail))
        .route("/category/{slug}", web::get().to(category::feed))
        .service(
            web::scope("/posts")
                .route("/create", web::get().to(posts::create_form))
                .route("/create", web::post().to(posts::create))
                .route("/{post_id}", web::get().to(posts::detail))
                .route("/{post_id}/edit", web::get().to(posts::edit_form))
                .route("/{post_id}/edit", web::post().to(posts::update))
                .route("/{post_id}/delete", web::get().to(posts::delete_form))
                .route("/{post_id}/delete", web::post().to(posts::delete))
                .route("/{post_id}/comment", web::post().to(comments::create))
                .route(
                    "/{post_id}/edit_comment/{comment_id}",
                    web::get().to(comments::edit_form),
                )
                .route(
                    "/{post_id}/edit_comment/{comment_id}",
                    web::post().to(comments::update),
                )
                .route(
                    "/{post_id}/delete_comment/{comment_id}",
                    web::post().to(comments::delete),
                ),
        )
        .service(
            web::scope("/admin")
                .route("/categories", web::post().to(admin::create_category))
                .route(
                    "/categories/{category_id}/edit",
                    web::post().to(admin::update_category),
                )
                .route("/locations", web::post().to(admin::create_location))
                .route(
                    "/locations/{location_id}/edit",
                    web::post().to(admin::update_location),
                ),
        );
}

/// `?page=N` query on every list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PageQuery {
    pub page: Option<u64>,
}

/// Soft denial: unauthorized writes bounce to the post's detail view instead
/// of a 403 page.
pub(crate) fn redirect_to_post(post_id: Uuid) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/posts/{post_id}")))
        .finish()
}

pub(crate) fn page_response<T, U>(page: Page<T>, f: impl FnMut(T) -> U) -> PageResponse<U> {
    let has_next = page.has_next();
    let has_previous = page.has_previous();
    PageResponse {
        items: page.items.into_iter().map(f).collect(),
        page: page.number,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages,
        has_next,
        has_previous,
    }
}

pub(crate) fn summary_dto(summary: PostSummary) -> PostSummaryResponse {
    let post = summary.post;
    PostSummaryResponse {
        id: post.id,
        author_id: post.author_id,
        category_id: post.category_id,
        location_id: post.location_id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
        comment_count: summary.comment_count,
    }
}

pub(crate) fn post_dto(post: Post) -> PostResponse {
    PostResponse {
        id: post.id,
        author_id: post.author_id,
        category_id: post.category_id,
        location_id: post.location_id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
    }
}

pub(crate) fn user_dto(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        first_name: user.first_name,
        last_name: user.last_name,
        created_at: user.created_at,
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use sea_orm::DbConn;
    use uuid::Uuid;

    use blogicum_core::ports::TokenService;
    use blogicum_infra::auth::{JwtConfig, JwtTokenService};

    use crate::state::AppState;

    pub(crate) fn token_service() -> Arc<dyn TokenService> {
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "handler-test-secret".to_string(),
            expiration_hours: 1,
            issuer: "blogicum-test".to_string(),
        }))
    }

    pub(crate) fn bearer(tokens: &Arc<dyn TokenService>, user_id: Uuid, username: &str) -> String {
        let token = tokens
            .generate_token(user_id, username, vec!["user".to_string()])
            .unwrap();
        format!("Bearer {token}")
    }

    pub(crate) fn app_state(db: DbConn) -> AppState {
        AppState::new(db, 10)
    }
}
