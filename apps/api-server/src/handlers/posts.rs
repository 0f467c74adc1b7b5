//! Post handlers: home feed, detail, create, edit, delete.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Post;
use blogicum_core::pagination::PageRequest;
use blogicum_core::visibility;
use blogicum_shared::dto::{
    CategoryRef, CommentResponse, LocationRef, PostDetailResponse, PostPayload, UserRef,
};

use crate::handlers::{PageQuery, page_response, post_dto, redirect_to_post, summary_dto};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_not_found(post_id: Uuid) -> AppError {
    DomainError::not_found("post", post_id).into()
}

fn validate(payload: &PostPayload) -> Result<(), DomainError> {
    if payload.title.trim().is_empty() {
        return Err(DomainError::validation("Title must not be empty"));
    }
    if payload.text.trim().is_empty() {
        return Err(DomainError::validation("Text must not be empty"));
    }
    Ok(())
}

fn apply_payload(post: &mut Post, payload: PostPayload) {
    post.title = payload.title;
    post.text = payload.text;
    post.pub_date = payload.pub_date;
    post.image = payload.image;
    post.location_id = payload.location_id;
    post.category_id = payload.category_id;
    post.is_published = payload.is_published;
}

/// GET / - paginated feed of publicly visible posts.
pub async fn feed(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page.unwrap_or(1), state.page_size);
    let feed = state.posts.visible_feed(page).await?;

    Ok(HttpResponse::Ok().json(page_response(feed, summary_dto)))
}

/// GET /posts/{post_id} - post detail with comments.
///
/// The visibility filter runs after the fetch; hidden posts answer 404 unless
/// the viewer is the author.
pub async fn detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    let category = match post.category_id {
        Some(id) => state.categories.find_by_id(id).await?,
        None => None,
    };

    let viewer_id = viewer.0.map(|i| i.user_id);
    if !visibility::can_view(viewer_id, &post, category.as_ref(), Utc::now()) {
        return Err(post_not_found(post_id));
    }

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("author missing for post {post_id}")))?;

    let location = match post.location_id {
        Some(id) => state.locations.find_by_id(id).await?,
        None => None,
    };

    let comments = state.comments.list_for_post(post_id).await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        id: post.id,
        title: post.title,
        text: post.text,
        pub_date: post.pub_date,
        image: post.image,
        is_published: post.is_published,
        created_at: post.created_at,
        author: UserRef {
            id: author.id,
            username: author.username,
        },
        category: category.map(|c| CategoryRef {
            id: c.id,
            title: c.title,
            slug: c.slug,
        }),
        location: location.map(|l| LocationRef {
            id: l.id,
            name: l.name,
        }),
        comments: comments
            .into_iter()
            .map(|c| CommentResponse {
                id: c.id,
                post_id: c.post_id,
                author_id: c.author_id,
                text: c.text,
                created_at: c.created_at,
            })
            .collect(),
    }))
}

/// GET /posts/create - blank form for a new post.
pub async fn create_form(_identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(PostPayload {
        title: String::new(),
        text: String::new(),
        pub_date: Utc::now(),
        image: None,
        location_id: None,
        category_id: None,
        is_published: true,
    }))
}

/// POST /posts/create - create a post; the authenticated user becomes the
/// author.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let payload = body.into_inner();
    validate(&payload)?;

    let mut post = Post::new(
        identity.user_id,
        payload.title.clone(),
        payload.text.clone(),
        payload.pub_date,
    );
    apply_payload(&mut post, payload);

    let saved = state.posts.insert(post).await?;
    tracing::info!(post_id = %saved.id, author = %identity.username, "Post created");

    Ok(HttpResponse::Created().json(post_dto(saved)))
}

/// GET /posts/{post_id}/edit - current values for the edit form.
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    Ok(HttpResponse::Ok().json(post_dto(post)))
}

/// POST /posts/{post_id}/edit - apply the edit (author only).
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let mut post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    let payload = body.into_inner();
    validate(&payload)?;
    apply_payload(&mut post, payload);

    let saved = state.posts.update(post).await?;

    Ok(HttpResponse::Ok().json(post_dto(saved)))
}

/// GET /posts/{post_id}/delete - the post, for delete confirmation.
pub async fn delete_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    Ok(HttpResponse::Ok().json(post_dto(post)))
}

/// POST /posts/{post_id}/delete - delete the post and, via the schema's
/// cascade, its comments.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();

    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| post_not_found(post_id))?;

    if !post.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    state.posts.delete(post_id).await?;
    tracing::info!(post_id = %post_id, author = %identity.username, "Post deleted");

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use chrono::Utc;
    use sea_orm::prelude::DateTimeWithTimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use serde_json::json;
    use uuid::Uuid;

    use blogicum_infra::database::entity::post;

    use crate::handlers::configure_routes;
    use crate::handlers::testing::{app_state, bearer, token_service};

    fn stored_post(post_id: Uuid, author_id: Uuid) -> post::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        post::Model {
            id: post_id,
            author_id,
            category_id: None,
            location_id: None,
            title: "Original title".to_owned(),
            text: "Original text".to_owned(),
            pub_date: now,
            image: None,
            is_published: true,
            created_at: now,
        }
    }

    #[actix_web::test]
    async fn test_non_author_edit_redirects_without_updating() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();

        // Only the fetch is mocked: an attempted UPDATE would exhaust the
        // mock and turn the response into a 500.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_post(post_id, author_id)]])
            .into_connection();

        let tokens = token_service();
        let auth = bearer(&tokens, intruder_id, "mallory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(db)))
                .app_data(web::Data::new(tokens))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/posts/{post_id}/edit"))
            .insert_header((header::AUTHORIZATION, auth))
            .set_json(json!({
                "title": "Hijacked",
                "text": "Hijacked",
                "pub_date": Utc::now(),
            }))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            &format!("/posts/{post_id}")
        );
    }

    #[actix_web::test]
    async fn test_non_author_delete_redirects_without_deleting() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_post(post_id, author_id)]])
            .into_connection();

        let tokens = token_service();
        let auth = bearer(&tokens, intruder_id, "mallory");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(db)))
                .app_data(web::Data::new(tokens))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/posts/{post_id}/delete"))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            &format!("/posts/{post_id}")
        );
    }

    #[actix_web::test]
    async fn test_author_passes_the_ownership_guard() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_post(post_id, author_id)]])
            .into_connection();

        let tokens = token_service();
        let auth = bearer(&tokens, author_id, "alice");

        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(db)))
                .app_data(web::Data::new(tokens))
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri(&format!("/posts/{post_id}/edit"))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["title"], "Original title");
    }
}
