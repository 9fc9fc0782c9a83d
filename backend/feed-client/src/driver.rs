//! Event loop around the controller.
//!
//! A single consumer drains the event channel, so transitions never overlap.
//! Network commands run on spawned tasks and report back through the same
//! channel.

use crate::api::{self, FeedApi};
use crate::controller::{ClientEvent, Command, FeedClientController};
use crate::render::FeedRenderer;
use std::sync::Arc;
use tokio::sync::mpsc;

pub struct FeedDriver<R: FeedRenderer> {
    controller: FeedClientController<R>,
    api: Arc<dyn FeedApi>,
    search_max_pages: u32,
    tx: mpsc::UnboundedSender<ClientEvent>,
    rx: mpsc::UnboundedReceiver<ClientEvent>,
}

impl<R: FeedRenderer> FeedDriver<R> {
    pub fn new(
        controller: FeedClientController<R>,
        api: Arc<dyn FeedApi>,
        search_max_pages: u32,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller,
            api,
            search_max_pages,
            tx,
            rx,
        }
    }

    /// Handle for feeding user input into the loop.
    pub fn sender(&self) -> mpsc::UnboundedSender<ClientEvent> {
        self.tx.clone()
    }

    pub fn controller(&self) -> &FeedClientController<R> {
        &self.controller
    }

    /// Waits for and applies one event. Returns `false` once `Quit` is seen.
    pub async fn pump(&mut self) -> bool {
        let Some(event) = self.rx.recv().await else {
            return false;
        };
        if event == ClientEvent::Quit {
            return false;
        }

        for command in self.controller.handle(event) {
            self.execute(command);
        }
        true
    }

    pub async fn run(mut self) -> FeedClientController<R> {
        while self.pump().await {}
        tracing::debug!("feed driver stopped");
        self.controller
    }

    fn execute(&self, command: Command) {
        let api = self.api.clone();
        let tx = self.tx.clone();

        match command {
            Command::FetchPage {
                generation,
                skip,
                limit,
                sort,
            } => {
                tokio::spawn(async move {
                    let result = api.fetch_page(skip, limit, sort).await;
                    let _ = tx.send(ClientEvent::PageLoaded { generation, result });
                });
            }
            Command::FetchAll { generation } => {
                let max_pages = self.search_max_pages;
                tokio::spawn(async move {
                    let result = api::fetch_all(api.as_ref(), max_pages).await;
                    let _ = tx.send(ClientEvent::SearchLoaded { generation, result });
                });
            }
            Command::SubmitPost(request) => {
                tokio::spawn(async move {
                    let result = api.create_post(request).await;
                    let _ = tx.send(ClientEvent::SubmitCompleted(result));
                });
            }
            Command::RestoreFormAfter(delay) => {
                tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(ClientEvent::RestoreForm);
                });
            }
        }
    }
}
