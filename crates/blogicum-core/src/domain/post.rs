use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog entry with publish-gating fields.
///
/// `pub_date` may lie in the future; such posts stay hidden from everyone but
/// their author until the date passes (scheduled publication).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    /// Media path of the attached image, if any. File storage is external.
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: Uuid, title: String, text: String, pub_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            category_id: None,
            location_id: None,
            title,
            text,
            pub_date,
            image: None,
            is_published: true,
            created_at: Utc::now(),
        }
    }

    /// Ownership guard: only the author may mutate or delete a post.
    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

/// A post as it appears in list views, annotated with its comment count.
///
/// The count is a read-time aggregate computed by the repository, never a
/// stored counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub post: Post,
    pub comment_count: u64,
}
