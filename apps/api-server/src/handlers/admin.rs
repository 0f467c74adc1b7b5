//! Staff-only management of categories and locations.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::{Category, Location};
use blogicum_shared::dto::{CategoryPayload, CategoryResponse, LocationPayload, LocationResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn require_staff(identity: &Identity) -> AppResult<()> {
    if identity.is_staff() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

fn category_dto(category: Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id,
        title: category.title,
        description: category.description,
        slug: category.slug,
        is_published: category.is_published,
        created_at: category.created_at,
    }
}

fn location_dto(location: Location) -> LocationResponse {
    LocationResponse {
        id: location.id,
        name: location.name,
        is_published: location.is_published,
        created_at: location.created_at,
    }
}

fn validate_slug(slug: &str) -> Result<(), DomainError> {
    if slug.is_empty()
        || !slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(DomainError::validation(
            "Slug may only contain letters, digits, hyphen and underscore",
        ));
    }
    Ok(())
}

/// POST /admin/categories - create a category.
pub async fn create_category(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryPayload>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let payload = body.into_inner();
    validate_slug(&payload.slug)?;

    let mut category = Category::new(payload.title, payload.description, payload.slug);
    category.is_published = payload.is_published;

    let saved = state.categories.insert(category).await?;
    tracing::info!(slug = %saved.slug, "Category created");

    Ok(HttpResponse::Created().json(category_dto(saved)))
}

/// POST /admin/categories/{category_id}/edit - update a category.
///
/// The slug is part of published URLs and stays fixed after creation.
pub async fn update_category(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryPayload>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let category_id = path.into_inner();
    let mut category = state
        .categories
        .find_by_id(category_id)
        .await?
        .ok_or_else(|| DomainError::not_found("category", category_id))?;

    let payload = body.into_inner();
    if payload.slug != category.slug {
        return Err(DomainError::validation("Slug is immutable").into());
    }

    category.title = payload.title;
    category.description = payload.description;
    category.is_published = payload.is_published;

    let saved = state.categories.update(category).await?;

    Ok(HttpResponse::Ok().json(category_dto(saved)))
}

/// POST /admin/locations - create a location.
pub async fn create_location(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<LocationPayload>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let payload = body.into_inner();
    if payload.name.trim().is_empty() {
        return Err(DomainError::validation("Name must not be empty").into());
    }

    let mut location = Location::new(payload.name);
    location.is_published = payload.is_published;

    let saved = state.locations.insert(location).await?;
    tracing::info!(name = %saved.name, "Location created");

    Ok(HttpResponse::Created().json(location_dto(saved)))
}

/// POST /admin/locations/{location_id}/edit - update a location.
pub async fn update_location(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<LocationPayload>,
) -> AppResult<HttpResponse> {
    require_staff(&identity)?;

    let location_id = path.into_inner();
    let mut location = state
        .locations
        .find_by_id(location_id)
        .await?
        .ok_or_else(|| DomainError::not_found("location", location_id))?;

    let payload = body.into_inner();
    if payload.name.trim().is_empty() {
        return Err(DomainError::validation("Name must not be empty").into());
    }

    location.name = payload.name;
    location.is_published = payload.is_published;

    let saved = state.locations.update(location).await?;

    Ok(HttpResponse::Ok().json(location_dto(saved)))
}
