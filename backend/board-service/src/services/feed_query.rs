/// Feed paging - turns a clamped window into a page of posts plus metadata
use crate::db::PostStore;
use crate::error::Result;
use crate::metrics::{FEED_REQUEST_DURATION_SECONDS, FEED_REQUEST_TOTAL};
use crate::models::{FeedPage, FeedWindow, PageMeta};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct FeedQueryEngine {
    store: Arc<dyn PostStore>,
}

impl FeedQueryEngine {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Reads one page of the feed.
    ///
    /// Count and window are read independently, so a concurrent insert may
    /// make `total` disagree with the returned posts by one.
    pub async fn get_page(&self, window: FeedWindow) -> Result<FeedPage> {
        let start = Instant::now();
        let result = tokio::try_join!(self.store.count(), self.store.find(&window));

        FEED_REQUEST_DURATION_SECONDS
            .with_label_values(&[window.sort.as_str()])
            .observe(start.elapsed().as_secs_f64());

        let (total, posts) = match result {
            Ok(read) => read,
            Err(err) => {
                FEED_REQUEST_TOTAL.with_label_values(&["error"]).inc();
                tracing::error!(
                    skip = window.skip,
                    limit = window.limit,
                    "feed query failed: {}",
                    err
                );
                return Err(err);
            }
        };
        FEED_REQUEST_TOTAL.with_label_values(&["ok"]).inc();

        tracing::debug!(
            skip = window.skip,
            limit = window.limit,
            sort = window.sort.as_str(),
            total,
            returned = posts.len(),
            "feed page served"
        );

        Ok(FeedPage {
            posts,
            meta: PageMeta::for_window(total, window.skip, window.limit),
        })
    }
}
