#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use sea_orm::prelude::DateTimeWithTimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use uuid::Uuid;

    use blogicum_core::domain::Post;
    use blogicum_core::pagination::PageRequest;
    use blogicum_core::ports::{
        BaseRepository, CategoryRepository, CommentRepository, PostRepository,
    };

    use crate::database::entity::{category, comment, post};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    };

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::from(n))])
    }

    fn summary_row(
        post_id: Uuid,
        author_id: Uuid,
        now: DateTimeWithTimeZone,
        comment_count: i64,
    ) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([
            ("id", Value::from(post_id)),
            ("author_id", Value::from(author_id)),
            ("category_id", Value::Uuid(None)),
            ("location_id", Value::Uuid(None)),
            ("title", Value::from("Feed Post")),
            ("text", Value::from("Body")),
            ("pub_date", Value::from(now)),
            ("image", Value::String(None)),
            ("is_published", Value::from(true)),
            ("created_at", Value::from(now)),
            ("comment_count", Value::from(comment_count)),
        ])
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post::Model {
                id: post_id,
                author_id,
                category_id: None,
                location_id: None,
                title: "Test Post".to_owned(),
                text: "Content".to_owned(),
                pub_date: now,
                image: None,
                is_published: true,
                created_at: now,
            }]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        assert!(result.is_some());
        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
    }

    #[tokio::test]
    async fn test_visible_feed_annotates_comment_count() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        // First statement counts the filtered set, second fetches the window.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(1)]])
            .append_query_results(vec![vec![summary_row(post_id, author_id, now, 3)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let page = repo.visible_feed(PageRequest::new(1, 10)).await.unwrap();

        assert_eq!(page.total_items, 1);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.number, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].post.id, post_id);
        assert_eq!(page.items[0].comment_count, 3);
    }

    #[tokio::test]
    async fn test_empty_feed_is_a_single_empty_page() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        // Requesting a page far past the end must clamp, not error.
        let page = repo.visible_feed(PageRequest::new(42, 10)).await.unwrap();

        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_author_feed_filters_hidden_posts_for_visitors() {
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.author_feed(author_id, false, PageRequest::new(1, 10))
            .await
            .unwrap();

        // The count statement carries the full filter; a visitor's view of a
        // profile must apply the public visibility predicate on top of the
        // author match.
        let log = repo.db.into_transaction_log();
        let count_sql = format!("{:?}", log[0]);
        assert!(count_sql.contains("author_id"));
        assert!(count_sql.contains("is_published"));
        assert!(count_sql.contains("pub_date"));
    }

    #[tokio::test]
    async fn test_author_feed_keeps_hidden_posts_for_the_owner() {
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![count_row(0)]])
            .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.author_feed(author_id, true, PageRequest::new(1, 10))
            .await
            .unwrap();

        // Owners see their drafts and scheduled posts: only the author match
        // remains in the filter.
        let log = repo.db.into_transaction_log();
        let count_sql = format!("{:?}", log[0]);
        assert!(count_sql.contains("author_id"));
        assert!(!count_sql.contains("is_published"));
        assert!(!count_sql.contains("pub_date"));
    }

    #[tokio::test]
    async fn test_list_comments_for_post() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                comment::Model {
                    id: Uuid::new_v4(),
                    post_id,
                    author_id,
                    text: "first".to_owned(),
                    created_at: now,
                },
                comment::Model {
                    id: Uuid::new_v4(),
                    post_id,
                    author_id,
                    text: "second".to_owned(),
                    created_at: now,
                },
            ]])
            .into_connection();

        let repo = PostgresCommentRepository::new(db);

        let comments = repo.list_for_post(post_id).await.unwrap();

        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "first");
        assert_eq!(comments[1].text, "second");
    }

    #[tokio::test]
    async fn test_find_category_by_slug() {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: Uuid::new_v4(),
                title: "Travel".to_owned(),
                description: "Places".to_owned(),
                slug: "travel".to_owned(),
                is_published: true,
                created_at: now,
            }]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let category = repo.find_by_slug("travel").await.unwrap().unwrap();
        assert_eq!(category.slug, "travel");
        assert!(category.is_published);
    }
}
