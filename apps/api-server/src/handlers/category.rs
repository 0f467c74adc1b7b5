//! Category feed handler.

use actix_web::{HttpResponse, web};

use blogicum_core::pagination::PageRequest;
use blogicum_shared::dto::{CategoryFeedResponse, CategoryResponse};

use crate::handlers::{PageQuery, page_response, summary_dto};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /category/{slug} - visible posts of a published category.
///
/// An unpublished category 404s exactly like a missing one; its existence is
/// not revealed.
pub async fn feed(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let slug = path.into_inner();

    let category = state
        .categories
        .find_by_slug(&slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or_else(|| AppError::NotFound(format!("category {slug} not found")))?;

    let page = PageRequest::new(query.page.unwrap_or(1), state.page_size);
    let posts = state.posts.category_feed(category.id, page).await?;

    Ok(HttpResponse::Ok().json(CategoryFeedResponse {
        category: CategoryResponse {
            id: category.id,
            title: category.title,
            description: category.description,
            slug: category.slug,
            is_published: category.is_published,
            created_at: category.created_at,
        },
        posts: page_response(posts, summary_dto),
    }))
}
