//! Fetch-and-save cycle.

use std::sync::Arc;

use tracing::{error, info};

use super::fetcher::FeedSource;
use super::types::{CycleReport, FeedItem};
use super::{INGEST_CATEGORY, PLACEHOLDER_IMAGE};
use crate::post::{NewPost, PostStore};
use crate::Result;

/// Runs one ingestion cycle: fetch, then check-then-insert per item.
pub struct IngestJob {
    source: Arc<dyn FeedSource>,
}

impl IngestJob {
    /// Create a job over the given feed source.
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        Self { source }
    }

    /// Fetch the feed and insert every item whose link is not yet a slug.
    ///
    /// A fetch or parse failure is logged and returned; nothing is written.
    /// A failing lookup or insert only affects its own item.
    pub async fn run_cycle(&self, store: &dyn PostStore) -> Result<CycleReport> {
        let items = match self.source.fetch().await {
            Ok(items) => items,
            Err(e) => {
                error!(error = %e, "Feed fetch failed, cycle abandoned");
                return Err(e);
            }
        };

        let mut report = CycleReport {
            fetched: items.len(),
            ..Default::default()
        };

        for item in items {
            match store.find_by_slug(&item.link).await {
                Ok(Some(_)) => {
                    report.skipped += 1;
                    continue;
                }
                Ok(None) => {}
                Err(e) => {
                    error!(link = %item.link, error = %e, "Slug lookup failed");
                    report.failed += 1;
                    continue;
                }
            }

            match store.insert(&build_post(&item)).await {
                Ok(post) => {
                    info!(post_id = post.id, title = %post.title, "Ingested new post");
                    report.inserted += 1;
                }
                Err(e) => {
                    error!(link = %item.link, error = %e, "Failed to save ingested post");
                    report.failed += 1;
                }
            }
        }

        info!(%report, "Ingestion cycle finished");
        Ok(report)
    }
}

/// Map a feed item onto a new post with the ingestion defaults.
pub fn build_post(item: &FeedItem) -> NewPost {
    let content = item
        .content_snippet
        .clone()
        .or_else(|| item.content.clone())
        .unwrap_or_default();
    let image = item
        .enclosure_url
        .clone()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());

    NewPost::new(&item.title, content)
        .with_slug(&item.link)
        .with_category(INGEST_CATEGORY)
        .with_image(image)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::post::{Post, PostRepository};
    use crate::{Database, GazetteError};

    struct StaticFeed {
        items: Vec<FeedItem>,
        calls: AtomicUsize,
    }

    impl StaticFeed {
        fn new(items: Vec<FeedItem>) -> Arc<Self> {
            Arc::new(Self {
                items,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FeedSource for StaticFeed {
        async fn fetch(&self) -> Result<Vec<FeedItem>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.items.clone())
        }
    }

    struct BrokenFeed;

    #[async_trait]
    impl FeedSource for BrokenFeed {
        async fn fetch(&self) -> Result<Vec<FeedItem>> {
            Err(GazetteError::Feed("connection reset".to_string()))
        }
    }

    /// Store that rejects inserts for one slug and records insert order.
    struct FlakyStore<'a> {
        inner: PostRepository<'a>,
        reject: String,
        inserted: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PostStore for FlakyStore<'_> {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>> {
            self.inner.find_by_slug(slug).await
        }

        async fn insert(&self, post: &NewPost) -> Result<Post> {
            if post.slug == self.reject {
                return Err(GazetteError::Database("disk I/O error".to_string()));
            }
            let created = self.inner.insert(post).await?;
            self.inserted.lock().unwrap().push(created.slug.clone());
            Ok(created)
        }
    }

    fn three_items() -> Vec<FeedItem> {
        vec![
            FeedItem::new("One", "https://news.example.com/1")
                .with_snippet("first")
                .with_enclosure("https://img.example.com/1.jpg"),
            FeedItem::new("Two", "https://news.example.com/2").with_content("<p>raw</p>"),
            FeedItem::new("Three", "https://news.example.com/3"),
        ]
    }

    #[tokio::test]
    async fn test_cycle_inserts_new_items() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let job = IngestJob::new(StaticFeed::new(three_items()));

        let report = job.run_cycle(&repo).await.unwrap();
        assert_eq!(
            report,
            CycleReport {
                fetched: 3,
                inserted: 3,
                skipped: 0,
                failed: 0
            }
        );
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_cycle_is_idempotent() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let feed = StaticFeed::new(three_items());
        let job = IngestJob::new(feed.clone());

        job.run_cycle(&repo).await.unwrap();
        let second = job.run_cycle(&repo).await.unwrap();

        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 3);
        assert_eq!(repo.count().await.unwrap(), 3);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_existing_post_is_not_modified() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let existing = repo
            .create(
                &NewPost::new("Edited by hand", "kept")
                    .with_slug("https://news.example.com/2")
                    .with_category("local"),
            )
            .await
            .unwrap();

        let job = IngestJob::new(StaticFeed::new(three_items()));
        let report = job.run_cycle(&repo).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.skipped, 1);

        let after = repo.get_by_id(existing.id).await.unwrap().unwrap();
        assert_eq!(after.title, "Edited by hand");
        assert_eq!(after.content, "kept");
        assert_eq!(after.category, "local");
        assert_eq!(after.updated_at, existing.updated_at);
    }

    #[tokio::test]
    async fn test_fallback_defaults() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let job = IngestJob::new(StaticFeed::new(three_items()));
        job.run_cycle(&repo).await.unwrap();

        let one = repo.get_by_slug("https://news.example.com/1").await.unwrap().unwrap();
        assert_eq!(one.content, "first");
        assert_eq!(one.image, "https://img.example.com/1.jpg");

        let two = repo.get_by_slug("https://news.example.com/2").await.unwrap().unwrap();
        assert_eq!(two.content, "<p>raw</p>");
        assert_eq!(two.image, PLACEHOLDER_IMAGE);

        let three = repo.get_by_slug("https://news.example.com/3").await.unwrap().unwrap();
        assert_eq!(three.content, "");
        assert_eq!(three.image, PLACEHOLDER_IMAGE);

        for post in [one, two, three] {
            assert_eq!(post.category, INGEST_CATEGORY);
            assert!(post.author_id.is_none());
        }
    }

    #[tokio::test]
    async fn test_partial_feed_inserts_in_order() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        repo.create(&NewPost::new("Two", "").with_slug("https://news.example.com/2"))
            .await
            .unwrap();

        let store = FlakyStore {
            inner: PostRepository::new(db.pool()),
            reject: String::new(),
            inserted: Mutex::new(Vec::new()),
        };
        let job = IngestJob::new(StaticFeed::new(three_items()));
        let report = job.run_cycle(&store).await.unwrap();

        assert_eq!(report.inserted, 2);
        assert_eq!(
            *store.inserted.lock().unwrap(),
            vec!["https://news.example.com/1", "https://news.example.com/3"]
        );
    }

    #[tokio::test]
    async fn test_repeated_link_in_one_pull_inserts_once() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let job = IngestJob::new(StaticFeed::new(vec![
            FeedItem::new("Breaking", "https://news.example.com/a"),
            FeedItem::new("Breaking (again)", "https://news.example.com/a"),
        ]));

        let report = job.run_cycle(&repo).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
        let post = repo.get_by_slug("https://news.example.com/a").await.unwrap().unwrap();
        assert_eq!(post.title, "Breaking");
    }

    #[tokio::test]
    async fn test_fetch_failure_leaves_store_untouched() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let job = IngestJob::new(Arc::new(BrokenFeed));

        let result = job.run_cycle(&repo).await;
        assert!(matches!(result, Err(GazetteError::Feed(_))));
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_failure_is_isolated() {
        let db = Database::open_in_memory().await.unwrap();
        let store = FlakyStore {
            inner: PostRepository::new(db.pool()),
            reject: "https://news.example.com/2".to_string(),
            inserted: Mutex::new(Vec::new()),
        };
        let job = IngestJob::new(StaticFeed::new(three_items()));

        let report = job.run_cycle(&store).await.unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(PostRepository::new(db.pool()).count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_link_in_one_feed_inserts_once() {
        let db = Database::open_in_memory().await.unwrap();
        let repo = PostRepository::new(db.pool());
        let items = vec![
            FeedItem::new("Same", "https://news.example.com/dup"),
            FeedItem::new("Same again", "https://news.example.com/dup"),
        ];
        let job = IngestJob::new(StaticFeed::new(items));

        let report = job.run_cycle(&repo).await.unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[test]
    fn test_build_post() {
        let post = build_post(&FeedItem::new("Headline", "https://a.example/x?utm=1"));
        assert_eq!(post.slug, "https://a.example/x?utm=1");
        assert_eq!(post.title, "Headline");
        assert_eq!(post.category, INGEST_CATEGORY);
        assert_eq!(post.image.as_deref(), Some(PLACEHOLDER_IMAGE));
        assert_eq!(post.content, "");
    }
}
