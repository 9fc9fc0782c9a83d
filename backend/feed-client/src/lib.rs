//! # Feed Client
//!
//! Client for the message board: pages through the feed, runs searches, and
//! submits posts.
//!
//! [`FeedClientController`] is a pure state machine. It consumes
//! [`ClientEvent`]s, drives a [`FeedRenderer`], and returns [`Command`]s
//! describing the network work to perform. [`FeedDriver`] owns the event
//! loop and executes those commands against a [`FeedApi`].

pub mod api;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod input;
pub mod render;
pub mod search;

pub use api::{FeedApi, HttpFeedApi, SearchResults};
pub use config::ClientConfig;
pub use controller::{ClientEvent, ClientFeedState, Command, FeedClientController, FeedMode, Phase};
pub use driver::FeedDriver;
pub use error::ClientError;
pub use render::{FeedRenderer, TerminalRenderer};
pub use search::is_valid_search;
