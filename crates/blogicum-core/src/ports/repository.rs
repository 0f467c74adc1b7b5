use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, Location, Post, PostSummary, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
///
/// `insert` and `update` are distinct because entity IDs are generated in the
/// domain layer; the store cannot tell a new entity from an existing one.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their unique username.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository. Feed queries apply the visibility filter in SQL and
/// annotate each post with its comment count.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Home feed: publicly visible posts, newest publication first.
    async fn visible_feed(&self, page: PageRequest) -> Result<Page<PostSummary>, RepoError>;

    /// Visible posts within one category, newest publication first.
    async fn category_feed(
        &self,
        category_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError>;

    /// One author's posts, newest publication first. `include_hidden` is true
    /// only when the profile owner is the viewer.
    async fn author_feed(
        &self,
        author_id: Uuid,
        include_hidden: bool,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// All comments under a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Find a category by its URL slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;
}

/// Location repository.
pub trait LocationRepository: BaseRepository<Location, Uuid> {}
