//! Authentication handlers.

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use blogicum_core::domain::User;
use blogicum_core::ports::{AuthError, PasswordService, TokenService};
use blogicum_shared::dto::{AuthResponse, LoginRequest, RegisterRequest};

use crate::handlers::user_dto;
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn roles_for(user: &User) -> Vec<String> {
    let mut roles = vec!["user".to_string()];
    if user.is_staff {
        roles.push("staff".to_string());
    }
    roles
}

/// POST /auth/register
pub async fn register(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // Validate input
    if req.username.is_empty()
        || !req
            .username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::BadRequest(
            "Username may only contain letters, digits, hyphen and underscore".to_string(),
        ));
    }
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if req.password.len() < 8 {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Check if user already exists
    if state.users.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }
    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let password_hash = password_service.hash(&req.password)?;

    // Create user
    let user = User::new(req.username, req.email, password_hash);
    let saved_user = state.users.insert(user).await?;

    // Generate token
    let token =
        token_service.generate_token(saved_user.id, &saved_user.username, roles_for(&saved_user))?;

    Ok(HttpResponse::Created().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }))
}

/// POST /auth/login
pub async fn login(
    state: web::Data<AppState>,
    token_service: web::Data<Arc<dyn TokenService>>,
    password_service: web::Data<Arc<dyn PasswordService>>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    // An unknown username and a wrong password answer identically.
    let user = state
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = password_service.verify(&req.password, &user.password_hash)?;

    if !valid {
        return Err(AuthError::InvalidCredentials.into());
    }

    // Generate token
    let token = token_service.generate_token(user.id, &user.username, roles_for(&user))?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: token_service.expiration_seconds().max(0) as u64,
    }))
}

/// GET /auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state
        .users
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("user no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(user_dto(user)))
}
