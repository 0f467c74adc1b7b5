//! Comment handlers: create, edit, delete under a post.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_core::DomainError;
use blogicum_core::domain::Comment;
use blogicum_shared::dto::{CommentPayload, CommentResponse};

use crate::handlers::redirect_to_post;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn comment_dto(comment: Comment) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        post_id: comment.post_id,
        author_id: comment.author_id,
        text: comment.text,
        created_at: comment.created_at,
    }
}

fn validate(payload: &CommentPayload) -> Result<(), DomainError> {
    if payload.text.trim().is_empty() {
        return Err(DomainError::validation("Comment text must not be empty"));
    }
    Ok(())
}

/// Fetch a comment and check it actually belongs to the post in the URL.
async fn fetch_comment(
    state: &AppState,
    post_id: Uuid,
    comment_id: Uuid,
) -> AppResult<Comment> {
    let comment = state
        .comments
        .find_by_id(comment_id)
        .await?
        .filter(|c| c.post_id == post_id)
        .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

    Ok(comment)
}

/// POST /posts/{post_id}/comment - add a comment to an existing post.
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    let payload = body.into_inner();
    validate(&payload)?;

    // The post must exist; its visibility is irrelevant for commenting.
    state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let comment = Comment::new(post_id, identity.user_id, payload.text);
    let saved = state.comments.insert(comment).await?;

    Ok(HttpResponse::Created().json(comment_dto(saved)))
}

/// GET /posts/{post_id}/edit_comment/{comment_id} - current values for the
/// edit form (author only, soft denial otherwise).
pub async fn edit_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = fetch_comment(&state, post_id, comment_id).await?;

    if !comment.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    Ok(HttpResponse::Ok().json(comment_dto(comment)))
}

/// POST /posts/{post_id}/edit_comment/{comment_id} - apply the edit.
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentPayload>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let mut comment = fetch_comment(&state, post_id, comment_id).await?;

    if !comment.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    let payload = body.into_inner();
    validate(&payload)?;
    comment.text = payload.text;

    let saved = state.comments.update(comment).await?;

    Ok(HttpResponse::Ok().json(comment_dto(saved)))
}

/// POST /posts/{post_id}/delete_comment/{comment_id} - delete the comment.
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();

    let comment = fetch_comment(&state, post_id, comment_id).await?;

    if !comment.is_authored_by(identity.user_id) {
        return Ok(redirect_to_post(post_id));
    }

    state.comments.delete(comment.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, test, web};
    use chrono::Utc;
    use sea_orm::prelude::DateTimeWithTimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use uuid::Uuid;

    use blogicum_infra::database::entity::comment;

    use crate::handlers::configure_routes;
    use crate::handlers::testing::{app_state, bearer, token_service};

    fn stored_comment(comment_id: Uuid, post_id: Uuid, author_id: Uuid) -> comment::Model {
        let now: DateTimeWithTimeZone = Utc::now().into();
        comment::Model {
            id: comment_id,
            post_id,
            author_id,
            text: "Original comment".to_owned(),
            created_at: now,
        }
    }

    #[actix_web::test]
    async fn test_non_author_comment_edit_redirects_without_updating() {
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();

        // Only the fetch is mocked: an attempted UPDATE would exhaust the
        // mock and turn the response into a 500.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_comment(comment_id, post_id, author_id)]])
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
            .uri(&format!("/posts/{post_id}/edit_comment/{comment_id}"))
            .insert_header((header::AUTHORIZATION, auth))
            .set_json(json!({ "text": "Hijacked" }))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            &format!("/posts/{post_id}")
        );
    }

    #[actix_web::test]
    async fn test_non_author_comment_delete_redirects_without_deleting() {
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let intruder_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_comment(comment_id, post_id, author_id)]])
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
            .uri(&format!("/posts/{post_id}/delete_comment/{comment_id}"))
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
    async fn test_author_can_delete_their_comment() {
        let post_id = Uuid::new_v4();
        let comment_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![stored_comment(comment_id, post_id, author_id)]])
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
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

        let req = test::TestRequest::post()
            .uri(&format!("/posts/{post_id}/delete_comment/{comment_id}"))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    }
}
