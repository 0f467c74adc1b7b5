//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Post, PostSummary, User};
use blogicum_core::error::RepoError;
use blogicum_core::pagination::{self, Page, PageRequest};
use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

use super::entity::{category, comment, location, post, user};
use super::postgres_base::PostgresBaseRepository;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<user::Entity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<post::Entity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<comment::Entity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<category::Entity>;

/// PostgreSQL location repository.
pub type PostgresLocationRepository = PostgresBaseRepository<location::Entity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        let masked = if let Some(at_pos) = email.find('@') {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = if local.len() > 1 {
                format!("{}***", &local[..1])
            } else {
                "***".to_string()
            };
            format!("{}{}", masked_local, domain)
        } else {
            "***".to_string()
        };
        tracing::debug!(user_email = %masked, "Finding user by email");

        let result = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

/// Row shape of feed queries: all post columns plus the comment aggregate.
#[derive(Debug, FromQueryResult)]
struct PostSummaryRow {
    id: Uuid,
    author_id: Uuid,
    category_id: Option<Uuid>,
    location_id: Option<Uuid>,
    title: String,
    text: String,
    pub_date: sea_orm::prelude::DateTimeWithTimeZone,
    image: Option<String>,
    is_published: bool,
    created_at: sea_orm::prelude::DateTimeWithTimeZone,
    comment_count: i64,
}

impl From<PostSummaryRow> for PostSummary {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            post: Post {
                id: row.id,
                author_id: row.author_id,
                category_id: row.category_id,
                location_id: row.location_id,
                title: row.title,
                text: row.text,
                pub_date: row.pub_date.into(),
                image: row.image,
                is_published: row.is_published,
                created_at: row.created_at.into(),
            },
            comment_count: row.comment_count.max(0) as u64,
        }
    }
}

/// SQL mirror of the public visibility predicate: published, category (if any)
/// published, publication date not in the future. Requires the category join.
fn public_filter() -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(Utc::now()))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

/// Base select for feed queries, with the category join the visibility
/// predicate needs.
fn feed_select(filter: Condition) -> Select<post::Entity> {
    post::Entity::find()
        .join(JoinType::LeftJoin, post::Relation::Category.def())
        .filter(filter)
}

impl PostgresPostRepository {
    /// Run a filtered, ordered, comment-annotated feed query and return one
    /// clamped page of it.
    async fn summary_page(
        &self,
        filter: Condition,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let total_items = feed_select(filter.clone())
            .count(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        let number = pagination::clamp_page(page.number, total_items, page.per_page);

        let rows = feed_select(filter)
            .join(JoinType::LeftJoin, post::Relation::Comments.def())
            .column_as(comment::Column::Id.count(), "comment_count")
            .group_by(post::Column::Id)
            .order_by_desc(post::Column::PubDate)
            .offset(pagination::offset(number, page.per_page))
            .limit(page.per_page)
            .into_model::<PostSummaryRow>()
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            number,
            page.per_page,
            total_items,
        ))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn visible_feed(&self, page: PageRequest) -> Result<Page<PostSummary>, RepoError> {
        self.summary_page(public_filter(), page).await
    }

    async fn category_feed(
        &self,
        category_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let filter = public_filter().add(post::Column::CategoryId.eq(category_id));
        self.summary_page(filter, page).await
    }

    async fn author_feed(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError> {
        let mut filter = Condition::all().add(post::Column::AuthorId.eq(author_id));
        if !include_hidden {
            filter = filter.add(public_filter());
        }
        self.summary_page(filter, page).await
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let result = comment::Entity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let result = category::Entity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }
}

impl LocationRepository for PostgresLocationRepository {}
