//! Profile handlers: public profile feed and self-service profile editing.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use blogicum_core::pagination::PageRequest;
use blogicum_shared::dto::{ProfileResponse, UpdateProfileRequest};

use crate::handlers::{PageQuery, page_response, summary_dto, user_dto};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /profile/{username} - a user's post feed.
///
/// The owner sees everything they wrote, unpublished and future-dated posts
/// included; every other viewer gets the visibility-filtered feed.
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let username = path.into_inner();

    let user = state
        .users
        .find_by_username(&username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {username} not found")))?;

    let is_owner = viewer.0.is_some_and(|i| i.user_id == user.id);
    let page = PageRequest::new(query.page.unwrap_or(1), state.page_size);

    let posts = state.posts.author_feed(user.id, is_owner, page).await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile: user_dto(user),
        posts: page_response(posts, summary_dto),
    }))
}

/// GET /edit_profile - own profile, for the edit form.
pub async fn edit_form(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(user_dto(user)))
}

/// POST /edit_profile - update own profile fields.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let mut user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user no longer exists".to_string()))?;

    let req = body.into_inner();

    if let Some(email) = req.email {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::BadRequest("Invalid email address".to_string()));
        }
        user.email = email;
    }
    if let Some(first_name) = req.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = req.last_name {
        user.last_name = last_name;
    }
    user.updated_at = Utc::now();

    let saved = state.users.update(user).await?;

    Ok(HttpResponse::Ok().json(user_dto(saved)))
}
