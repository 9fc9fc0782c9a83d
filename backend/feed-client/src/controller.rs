//! Client-side feed state machine.
//!
//! The controller never performs I/O. Every transition updates the view
//! through the injected [`FeedRenderer`] and returns the [`Command`]s the
//! driver must execute. Results come back as [`ClientEvent`]s tagged with
//! the generation they were issued under; a refresh or a search bumps the
//! generation, so responses to superseded requests are dropped.

use crate::api::SearchResults;
use crate::error::ClientError;
use crate::render::FeedRenderer;
use crate::search;
use board_types::{is_valid_post, CreatePostRequest, FeedPage, Post, SortOrder};
use std::time::Duration;

const INVALID_POST_MESSAGE: &str = "Name and content are required. Name cannot be longer than 50 characters and content cannot be longer than 140 characters.";
const INVALID_SEARCH_MESSAGE: &str = "Search must be 1 to 20 characters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingPage,
    /// The server reported no more pages. Only a refresh leaves this phase.
    Finished,
    SearchMode,
    Submitting,
    /// The last fetch failed. Waits for `Retry` or `Refresh`.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode {
    Feed,
    Search,
}

/// Pagination cursor and guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFeedState {
    pub skip: i64,
    pub limit: i64,
    /// Set before a fetch is issued, cleared once its result is processed.
    pub loading: bool,
    pub finished: bool,
    pub mode: FeedMode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Initial load.
    Start,
    /// The load-more sentinel came into view.
    SentinelVisible,
    Refresh,
    Retry,
    Search(String),
    Submit { name: String, content: String },
    PageLoaded {
        generation: u64,
        result: Result<FeedPage, ClientError>,
    },
    SearchLoaded {
        generation: u64,
        result: Result<SearchResults, ClientError>,
    },
    SubmitCompleted(Result<Post, ClientError>),
    RestoreForm,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchPage {
        generation: u64,
        skip: i64,
        limit: i64,
        sort: SortOrder,
    },
    FetchAll {
        generation: u64,
    },
    SubmitPost(CreatePostRequest),
    RestoreFormAfter(Duration),
}

/// What `Retry` re-issues after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Pending {
    Page { skip: i64, previous_skip: i64 },
    Search { needle: String },
}

pub struct FeedClientController<R: FeedRenderer> {
    renderer: R,
    state: ClientFeedState,
    phase: Phase,
    generation: u64,
    page_size: i64,
    restore_delay: Duration,
    pending: Option<Pending>,
    /// Phase to return to if a submit fails.
    before_submit: Phase,
}

impl<R: FeedRenderer> FeedClientController<R> {
    pub fn new(renderer: R, page_size: i64, restore_delay: Duration) -> Self {
        let page_size = page_size.max(1);
        Self {
            renderer,
            state: ClientFeedState {
                skip: 0,
                limit: page_size,
                loading: false,
                finished: false,
                mode: FeedMode::Feed,
            },
            phase: Phase::Idle,
            generation: 0,
            page_size,
            restore_delay,
            pending: None,
            before_submit: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ClientFeedState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Applies one event. Events must be fed one at a time, in order.
    pub fn handle(&mut self, event: ClientEvent) -> Vec<Command> {
        match event {
            ClientEvent::Start | ClientEvent::Refresh => self.refresh(),
            ClientEvent::SentinelVisible => self.load_more(),
            ClientEvent::Retry => self.retry(),
            ClientEvent::Search(term) => self.search(&term),
            ClientEvent::Submit { name, content } => self.submit(name, content),
            ClientEvent::PageLoaded { generation, result } => {
                self.page_loaded(generation, result);
                Vec::new()
            }
            ClientEvent::SearchLoaded { generation, result } => {
                self.search_loaded(generation, result);
                Vec::new()
            }
            ClientEvent::SubmitCompleted(result) => self.submit_completed(result),
            ClientEvent::RestoreForm => {
                self.renderer.show_form();
                Vec::new()
            }
            ClientEvent::Quit => Vec::new(),
        }
    }

    /// Full reset to the first page of the feed.
    fn refresh(&mut self) -> Vec<Command> {
        if self.phase == Phase::Submitting {
            return Vec::new();
        }

        self.generation += 1;
        self.state = ClientFeedState {
            skip: 0,
            limit: self.page_size,
            loading: false,
            finished: false,
            mode: FeedMode::Feed,
        };
        self.renderer.clear_posts();
        self.renderer.hide_sentinel();
        self.renderer.clear_error();

        self.issue_page(0, 0)
    }

    fn load_more(&mut self) -> Vec<Command> {
        if self.phase != Phase::Idle || self.state.loading || self.state.finished {
            return Vec::new();
        }

        let previous_skip = self.state.skip;
        let skip = previous_skip + self.state.limit;
        self.issue_page(skip, previous_skip)
    }

    fn issue_page(&mut self, skip: i64, previous_skip: i64) -> Vec<Command> {
        self.state.skip = skip;
        self.state.loading = true;
        self.phase = Phase::LoadingPage;
        self.pending = Some(Pending::Page {
            skip,
            previous_skip,
        });

        vec![Command::FetchPage {
            generation: self.generation,
            skip,
            limit: self.state.limit,
            sort: SortOrder::Desc,
        }]
    }

    fn retry(&mut self) -> Vec<Command> {
        if self.phase != Phase::Failed {
            return Vec::new();
        }
        self.renderer.clear_error();

        match self.pending.clone() {
            Some(Pending::Page {
                skip,
                previous_skip,
            }) => self.issue_page(skip, previous_skip),
            Some(Pending::Search { needle }) => self.issue_search(needle),
            None => self.refresh(),
        }
    }

    fn page_loaded(&mut self, generation: u64, result: Result<FeedPage, ClientError>) {
        if generation != self.generation || self.state.mode != FeedMode::Feed {
            tracing::debug!(generation, current = self.generation, "dropping stale page");
            return;
        }

        self.state.loading = false;
        match result {
            Ok(page) => {
                self.pending = None;
                self.state.skip = page.meta.skip;
                self.state.limit = page.meta.limit;
                self.state.finished = !page.meta.has_more;

                for post in &page.posts {
                    let node = self.renderer.render_post(post);
                    self.renderer.append_post(node);
                }
                self.renderer.clear_error();

                if self.state.finished {
                    self.renderer.hide_sentinel();
                    self.renderer.show_end_of_feed();
                    self.settle(Phase::Finished);
                } else {
                    self.renderer.show_sentinel();
                    self.settle(Phase::Idle);
                }
            }
            Err(err) => {
                if let Some(Pending::Page { previous_skip, .. }) = &self.pending {
                    self.state.skip = *previous_skip;
                }
                tracing::warn!(skip = self.state.skip, "page load failed: {}", err);
                self.renderer.hide_sentinel();
                self.renderer.show_error(&err.to_string());
                self.settle(Phase::Failed);
            }
        }
    }

    /// A fetch that completes mid-submit lands in the phase restored afterwards.
    fn settle(&mut self, phase: Phase) {
        if self.phase == Phase::Submitting {
            self.before_submit = phase;
        } else {
            self.phase = phase;
        }
    }

    fn search(&mut self, term: &str) -> Vec<Command> {
        if self.phase == Phase::Submitting {
            return Vec::new();
        }
        if !search::is_valid_search(term) {
            self.renderer.show_error(INVALID_SEARCH_MESSAGE);
            return Vec::new();
        }

        self.generation += 1;
        self.state.mode = FeedMode::Search;
        self.state.finished = false;
        self.renderer.clear_posts();
        self.renderer.hide_sentinel();
        self.renderer.clear_error();

        self.issue_search(search::normalize(term))
    }

    fn issue_search(&mut self, needle: String) -> Vec<Command> {
        self.state.loading = true;
        self.phase = Phase::SearchMode;
        self.pending = Some(Pending::Search { needle });

        vec![Command::FetchAll {
            generation: self.generation,
        }]
    }

    fn search_loaded(&mut self, generation: u64, result: Result<SearchResults, ClientError>) {
        if generation != self.generation || self.state.mode != FeedMode::Search {
            tracing::debug!(generation, current = self.generation, "dropping stale search");
            return;
        }

        self.state.loading = false;
        let needle = match &self.pending {
            Some(Pending::Search { needle }) => needle.clone(),
            _ => return,
        };

        match result {
            Ok(results) => {
                self.pending = None;
                for post in results.posts.iter().filter(|p| search::matches(p, &needle)) {
                    let node = self.renderer.render_post(post);
                    self.renderer.append_post(node);
                }
                if results.truncated {
                    self.renderer.show_error(&format!(
                        "Only the newest {} posts were searched.",
                        results.posts.len()
                    ));
                }
                self.settle(Phase::SearchMode);
            }
            Err(err) => {
                tracing::warn!("search failed: {}", err);
                self.renderer.show_error(&err.to_string());
                self.settle(Phase::Failed);
            }
        }
    }

    fn submit(&mut self, name: String, content: String) -> Vec<Command> {
        if matches!(self.phase, Phase::LoadingPage | Phase::Submitting) {
            return Vec::new();
        }
        if !is_valid_post(&name, &content) {
            self.renderer.show_error(INVALID_POST_MESSAGE);
            return Vec::new();
        }

        self.before_submit = self.phase;
        self.phase = Phase::Submitting;
        self.renderer.clear_error();
        self.renderer.hide_form();
        self.renderer.show_loading_indicator();

        vec![Command::SubmitPost(CreatePostRequest::new(name, content))]
    }

    fn submit_completed(&mut self, result: Result<Post, ClientError>) -> Vec<Command> {
        if self.phase != Phase::Submitting {
            return Vec::new();
        }
        self.renderer.hide_loading_indicator();

        match result {
            Ok(post) => {
                tracing::info!(post_id = post.id, "post submitted");
                self.renderer.reset_form();
                // Leave Submitting so the refresh below is accepted.
                self.phase = Phase::Idle;

                let mut commands = vec![Command::RestoreFormAfter(self.restore_delay)];
                commands.extend(self.refresh());
                commands
            }
            Err(err) => {
                self.renderer.show_form();
                self.renderer.show_error(&err.to_string());
                self.phase = self.before_submit;
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TerminalRenderer;
    use board_types::PageMeta;
    use chrono::Utc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Append(String),
        Clear,
        ShowSentinel,
        HideSentinel,
        EndOfFeed,
        ShowForm,
        HideForm,
        ResetForm,
        ShowLoading,
        HideLoading,
        Error(String),
        ClearError,
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl Recorder {
        fn appended(&self) -> Vec<String> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Append(name) => Some(name.clone()),
                    _ => None,
                })
                .collect()
        }

        fn last_error(&self) -> Option<String> {
            self.calls.iter().rev().find_map(|c| match c {
                Call::Error(msg) => Some(msg.clone()),
                _ => None,
            })
        }
    }

    impl FeedRenderer for Recorder {
        type Node = String;

        fn render_post(&mut self, post: &Post) -> String {
            post.name.clone()
        }
        fn append_post(&mut self, node: String) {
            self.calls.push(Call::Append(node));
        }
        fn clear_posts(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn show_sentinel(&mut self) {
            self.calls.push(Call::ShowSentinel);
        }
        fn hide_sentinel(&mut self) {
            self.calls.push(Call::HideSentinel);
        }
        fn show_end_of_feed(&mut self) {
            self.calls.push(Call::EndOfFeed);
        }
        fn show_form(&mut self) {
            self.calls.push(Call::ShowForm);
        }
        fn hide_form(&mut self) {
            self.calls.push(Call::HideForm);
        }
        fn reset_form(&mut self) {
            self.calls.push(Call::ResetForm);
        }
        fn show_loading_indicator(&mut self) {
            self.calls.push(Call::ShowLoading);
        }
        fn hide_loading_indicator(&mut self) {
            self.calls.push(Call::HideLoading);
        }
        fn show_error(&mut self, message: &str) {
            self.calls.push(Call::Error(message.to_string()));
        }
        fn clear_error(&mut self) {
            self.calls.push(Call::ClearError);
        }
    }

    fn controller() -> FeedClientController<Recorder> {
        FeedClientController::new(Recorder::default(), 5, Duration::from_secs(10))
    }

    fn post(id: i64, name: &str, content: &str) -> Post {
        Post {
            id,
            name: name.to_string(),
            content: content.to_string(),
            like_count: 0,
            created: Utc::now(),
        }
    }

    fn page(skip: i64, limit: i64, total: i64) -> FeedPage {
        let end = (skip + limit).min(total);
        FeedPage {
            posts: (skip..end).map(|i| post(i, &format!("p{}", i), "hi")).collect(),
            meta: PageMeta::for_window(total, skip, limit),
        }
    }

    fn fetch_of(commands: &[Command]) -> (u64, i64, i64) {
        match commands {
            [Command::FetchPage {
                generation,
                skip,
                limit,
                ..
            }] => (*generation, *skip, *limit),
            other => panic!("expected one FetchPage, got {:?}", other),
        }
    }

    fn loaded(c: &mut FeedClientController<Recorder>, commands: &[Command], total: i64) {
        let (generation, skip, limit) = fetch_of(commands);
        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Ok(page(skip, limit, total)),
        });
    }

    #[test]
    fn test_start_fetches_first_page() {
        let mut c = controller();
        let commands = c.handle(ClientEvent::Start);

        let (_, skip, limit) = fetch_of(&commands);
        assert_eq!((skip, limit), (0, 5));
        assert_eq!(c.phase(), Phase::LoadingPage);
        assert!(c.state().loading);
    }

    #[test]
    fn test_scroll_while_loading_issues_nothing() {
        let mut c = controller();
        c.handle(ClientEvent::Start);

        assert!(c.handle(ClientEvent::SentinelVisible).is_empty());
        assert!(c.handle(ClientEvent::SentinelVisible).is_empty());
    }

    #[test]
    fn test_scroll_advances_cursor() {
        let mut c = controller();
        let first = c.handle(ClientEvent::Start);
        loaded(&mut c, &first, 12);
        assert_eq!(c.phase(), Phase::Idle);
        assert!(c.renderer().calls.contains(&Call::ShowSentinel));

        let next = c.handle(ClientEvent::SentinelVisible);
        let (_, skip, limit) = fetch_of(&next);
        assert_eq!((skip, limit), (5, 5));
    }

    #[test]
    fn test_finished_blocks_scroll_until_refresh() {
        let mut c = controller();
        let first = c.handle(ClientEvent::Start);
        loaded(&mut c, &first, 3);

        assert_eq!(c.phase(), Phase::Finished);
        assert!(c.state().finished);
        assert_eq!(c.renderer().calls.last(), Some(&Call::EndOfFeed));
        assert!(c.handle(ClientEvent::SentinelVisible).is_empty());

        let again = c.handle(ClientEvent::Refresh);
        let (_, skip, _) = fetch_of(&again);
        assert_eq!(skip, 0);
        assert!(!c.state().finished);
    }

    #[test]
    fn test_walks_to_last_page() {
        let mut c = controller();
        let mut commands = c.handle(ClientEvent::Start);
        loop {
            loaded(&mut c, &commands, 12);
            if c.phase() == Phase::Finished {
                break;
            }
            commands = c.handle(ClientEvent::SentinelVisible);
        }

        assert_eq!(c.renderer().appended().len(), 12);
        assert_eq!(c.state().skip, 10);
    }

    #[test]
    fn test_adopts_server_window() {
        let mut c = FeedClientController::new(Recorder::default(), 500, Duration::from_secs(10));
        let commands = c.handle(ClientEvent::Start);
        let (generation, _, _) = fetch_of(&commands);

        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Ok(page(0, 50, 120)),
        });
        let (_, skip, limit) = fetch_of(&c.handle(ClientEvent::SentinelVisible));
        assert_eq!((skip, limit), (50, 50));
    }

    #[test]
    fn test_failure_is_distinct_from_finished() {
        let mut c = controller();
        let first = c.handle(ClientEvent::Start);
        loaded(&mut c, &first, 12);

        let next = c.handle(ClientEvent::SentinelVisible);
        let (generation, _, _) = fetch_of(&next);
        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Err(ClientError::Timeout(10_000)),
        });

        assert_eq!(c.phase(), Phase::Failed);
        assert!(!c.state().loading);
        assert!(!c.state().finished);
        assert_eq!(c.state().skip, 0);
        assert!(c.renderer().last_error().unwrap().contains("10000ms"));
        assert!(c.handle(ClientEvent::SentinelVisible).is_empty());

        let retried = c.handle(ClientEvent::Retry);
        let (_, skip, _) = fetch_of(&retried);
        assert_eq!(skip, 5);
    }

    #[test]
    fn test_stale_page_after_refresh_is_dropped() {
        let mut c = controller();
        let stale = c.handle(ClientEvent::Start);
        let fresh = c.handle(ClientEvent::Refresh);

        let (stale_gen, _, _) = fetch_of(&stale);
        c.handle(ClientEvent::PageLoaded {
            generation: stale_gen,
            result: Ok(page(0, 5, 12)),
        });
        assert!(c.state().loading);
        assert!(c.renderer().appended().is_empty());

        loaded(&mut c, &fresh, 12);
        assert_eq!(c.renderer().appended().len(), 5);
    }

    #[test]
    fn test_search_filters_and_ignores_stale_pages() {
        let mut c = controller();
        let feed = c.handle(ClientEvent::Start);
        let commands = c.handle(ClientEvent::Search("  CATS ".to_string()));

        let generation = match commands.as_slice() {
            [Command::FetchAll { generation }] => *generation,
            other => panic!("expected FetchAll, got {:?}", other),
        };
        assert_eq!(c.state().mode, FeedMode::Search);

        loaded(&mut c, &feed, 12);
        assert!(c.renderer().appended().is_empty());

        c.handle(ClientEvent::SearchLoaded {
            generation,
            result: Ok(SearchResults {
                posts: vec![
                    post(1, "Cathy", "I like cats"),
                    post(2, "Bob", "dogs"),
                    post(3, "cats4life", "meow"),
                ],
                truncated: false,
            }),
        });

        assert_eq!(c.renderer().appended(), ["Cathy", "cats4life"]);
        assert_eq!(c.renderer().last_error(), None);
        assert_eq!(c.phase(), Phase::SearchMode);
        assert!(c.handle(ClientEvent::SentinelVisible).is_empty());
    }

    #[test]
    fn test_invalid_search_changes_nothing() {
        let mut c = controller();
        assert!(c.handle(ClientEvent::Search(String::new())).is_empty());
        assert!(c.handle(ClientEvent::Search("a".repeat(21))).is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.generation(), 0);
    }

    #[test]
    fn test_submit_success_refreshes() {
        let mut c = controller();
        let first = c.handle(ClientEvent::Start);
        loaded(&mut c, &first, 3);

        let commands = c.handle(ClientEvent::Submit {
            name: "Bob".to_string(),
            content: "hello".to_string(),
        });
        assert_eq!(
            commands,
            [Command::SubmitPost(CreatePostRequest::new("Bob", "hello"))]
        );
        assert_eq!(c.phase(), Phase::Submitting);
        assert!(c.renderer().calls.ends_with(&[Call::HideForm, Call::ShowLoading]));

        let after = c.handle(ClientEvent::SubmitCompleted(Ok(post(4, "Bob", "hello"))));
        assert_eq!(after[0], Command::RestoreFormAfter(Duration::from_secs(10)));
        let (_, skip, _) = fetch_of(&after[1..]);
        assert_eq!(skip, 0);
        assert_eq!(c.phase(), Phase::LoadingPage);
        assert!(c.renderer().calls.contains(&Call::ResetForm));
        assert!(!c.renderer().calls.contains(&Call::ShowForm));

        c.handle(ClientEvent::RestoreForm);
        assert_eq!(c.renderer().calls.last(), Some(&Call::ShowForm));
    }

    #[test]
    fn test_submit_failure_restores_form() {
        let mut c = controller();
        let first = c.handle(ClientEvent::Start);
        loaded(&mut c, &first, 12);

        c.handle(ClientEvent::Submit {
            name: "Bob".to_string(),
            content: "again".to_string(),
        });
        let after = c.handle(ClientEvent::SubmitCompleted(Err(ClientError::RateLimited(
            "Too many posts".to_string(),
        ))));

        assert!(after.is_empty());
        assert_eq!(c.phase(), Phase::Idle);
        assert_eq!(c.renderer().last_error().as_deref(), Some("Too many posts"));
        assert!(c.renderer().calls.ends_with(&[
            Call::HideLoading,
            Call::ShowForm,
            Call::Error("Too many posts".to_string()),
        ]));
    }

    #[test]
    fn test_submit_is_validated_and_guarded() {
        let mut c = controller();
        let commands = c.handle(ClientEvent::Submit {
            name: "  ".to_string(),
            content: "hi".to_string(),
        });
        assert!(commands.is_empty());
        assert_eq!(c.renderer().last_error().as_deref(), Some(INVALID_POST_MESSAGE));

        c.handle(ClientEvent::Start);
        let commands = c.handle(ClientEvent::Submit {
            name: "Bob".to_string(),
            content: "hi".to_string(),
        });
        assert!(commands.is_empty());
        assert_eq!(c.phase(), Phase::LoadingPage);
    }
    #[test]
    fn test_failed_load_does_not_print_end_of_feed() {
        let mut c = FeedClientController::new(
            TerminalRenderer::new(Vec::new()),
            5,
            Duration::from_secs(10),
        );
        let (generation, skip, limit) = fetch_of(&c.handle(ClientEvent::Start));
        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Ok(page(skip, limit, 12)),
        });
        let (generation, _, _) = fetch_of(&c.handle(ClientEvent::SentinelVisible));
        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Err(ClientError::Network("reset".to_string())),
        });

        assert_eq!(c.phase(), Phase::Failed);
        let out = String::from_utf8(c.into_renderer().into_inner()).unwrap();
        assert!(out.ends_with("error: Could not reach the board: reset\n"));
        assert!(!out.contains("end of feed"));
    }

    #[test]
    fn test_last_page_prints_end_of_feed_once() {
        let mut c = FeedClientController::new(
            TerminalRenderer::new(Vec::new()),
            5,
            Duration::from_secs(10),
        );
        let (generation, skip, limit) = fetch_of(&c.handle(ClientEvent::Start));
        c.handle(ClientEvent::PageLoaded {
            generation,
            result: Ok(page(skip, limit, 3)),
        });
        c.handle(ClientEvent::Refresh);

        let out = String::from_utf8(c.into_renderer().into_inner()).unwrap();
        assert_eq!(out.matches("-- end of feed --").count(), 1);
    }

    #[test]
    fn test_truncated_search_is_reported() {
        let mut c = controller();
        let commands = c.handle(ClientEvent::Search("cats".to_string()));
        let generation = match commands.as_slice() {
            [Command::FetchAll { generation }] => *generation,
            other => panic!("expected FetchAll, got {:?}", other),
        };

        c.handle(ClientEvent::SearchLoaded {
            generation,
            result: Ok(SearchResults {
                posts: vec![post(1, "Cathy", "cats"), post(2, "Bob", "dogs")],
                truncated: true,
            }),
        });

        assert_eq!(c.renderer().appended(), ["Cathy"]);
        assert_eq!(
            c.renderer().last_error().as_deref(),
            Some("Only the newest 2 posts were searched.")
        );
        assert_eq!(c.phase(), Phase::SearchMode);
    }
}
