//! The read-path visibility filter.
//!
//! A post is publicly visible only when it is published, its category (if any)
//! is published, and its publication date is not in the future. The author
//! bypasses the filter entirely, which is what makes preview-before-publish
//! work. List queries mirror this predicate in SQL; the detail path applies it
//! here after the fetch and answers not-found on failure.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Category, Post};

/// Public visibility predicate, without the author bypass.
pub fn post_is_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && category.is_none_or(|c| c.is_published) && post.pub_date <= now
}

/// Full read check: the author always sees their own post, everyone else goes
/// through [`post_is_visible`].
pub fn can_view(
    viewer: Option<Uuid>,
    post: &Post,
    category: Option<&Category>,
    now: DateTime<Utc>,
) -> bool {
    viewer.is_some_and(|v| post.is_authored_by(v)) || post_is_visible(post, category, now)
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn published_post(author_id: Uuid, now: DateTime<Utc>) -> Post {
        let mut post = Post::new(
            author_id,
            "title".to_owned(),
            "text".to_owned(),
            now - TimeDelta::hours(1),
        );
        post.is_published = true;
        post
    }

    fn published_category() -> Category {
        Category::new("cat".to_owned(), "desc".to_owned(), "cat".to_owned())
    }

    #[test]
    fn visible_when_all_gates_pass() {
        let now = Utc::now();
        let post = published_post(Uuid::new_v4(), now);
        let category = published_category();

        assert!(post_is_visible(&post, Some(&category), now));
        assert!(post_is_visible(&post, None, now));
    }

    #[test]
    fn hidden_when_unpublished() {
        let now = Utc::now();
        let mut post = published_post(Uuid::new_v4(), now);
        post.is_published = false;

        assert!(!post_is_visible(&post, None, now));
    }

    #[test]
    fn hidden_when_category_unpublished() {
        let now = Utc::now();
        let post = published_post(Uuid::new_v4(), now);
        let mut category = published_category();
        category.is_published = false;

        assert!(!post_is_visible(&post, Some(&category), now));
    }

    #[test]
    fn hidden_when_pub_date_in_future() {
        let now = Utc::now();
        let mut post = published_post(Uuid::new_v4(), now);
        post.pub_date = now + TimeDelta::hours(1);

        assert!(!post_is_visible(&post, None, now));
    }

    #[test]
    fn author_sees_own_hidden_post() {
        let now = Utc::now();
        let author = Uuid::new_v4();
        let mut post = published_post(author, now);
        post.is_published = false;
        post.pub_date = now + TimeDelta::days(7);

        assert!(can_view(Some(author), &post, None, now));
    }

    #[test]
    fn non_author_denied_on_hidden_post() {
        let now = Utc::now();
        let mut post = published_post(Uuid::new_v4(), now);
        post.is_published = false;

        assert!(!can_view(Some(Uuid::new_v4()), &post, None, now));
        assert!(!can_view(None, &post, None, now));
    }

    #[test]
    fn anonymous_sees_public_post() {
        let now = Utc::now();
        let post = published_post(Uuid::new_v4(), now);

        assert!(can_view(None, &post, None, now));
    }
}
