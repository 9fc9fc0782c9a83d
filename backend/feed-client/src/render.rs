//! Rendering seam between the controller and whatever displays the feed.

use board_types::Post;
use std::io::Write;

pub trait FeedRenderer {
    /// Renderer-specific representation of one post.
    type Node;

    fn render_post(&mut self, post: &Post) -> Self::Node;
    /// Appends a rendered post to the end of the feed container.
    fn append_post(&mut self, node: Self::Node);
    fn clear_posts(&mut self);

    fn show_sentinel(&mut self);
    fn hide_sentinel(&mut self);
    /// Marks the feed as exhausted. Only shown once the server reports no
    /// more pages, never after a failure.
    fn show_end_of_feed(&mut self);

    fn show_form(&mut self);
    fn hide_form(&mut self);
    /// Clears the form fields.
    fn reset_form(&mut self);

    fn show_loading_indicator(&mut self);
    fn hide_loading_indicator(&mut self);

    fn show_error(&mut self, message: &str);
    fn clear_error(&mut self);
}

/// Line-oriented renderer for a terminal. Write failures are logged and
/// otherwise ignored.
pub struct TerminalRenderer<W: Write> {
    out: W,
    form_visible: bool,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            form_visible: true,
        }
    }

    pub fn form_visible(&self) -> bool {
        self.form_visible
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) {
        if let Err(e) = writeln!(self.out, "{}", text).and_then(|_| self.out.flush()) {
            tracing::warn!("terminal write failed: {}", e);
        }
    }
}

impl<W: Write> FeedRenderer for TerminalRenderer<W> {
    type Node = String;

    fn render_post(&mut self, post: &Post) -> String {
        format!(
            "[{}] {}: {}  ({} likes)",
            post.created.format("%Y-%m-%d %H:%M"),
            post.name,
            post.content,
            post.like_count
        )
    }

    fn append_post(&mut self, node: String) {
        self.line(&node);
    }

    fn clear_posts(&mut self) {
        self.line("==============================");
    }

    fn show_sentinel(&mut self) {
        self.line("-- more: press Enter --");
    }

    fn hide_sentinel(&mut self) {}

    fn show_end_of_feed(&mut self) {
        self.line("-- end of feed --");
    }

    fn show_form(&mut self) {
        self.form_visible = true;
        self.line("(post with: post <name> | <content>)");
    }

    fn hide_form(&mut self) {
        self.form_visible = false;
    }

    fn reset_form(&mut self) {}

    fn show_loading_indicator(&mut self) {
        self.line("posting...");
    }

    fn hide_loading_indicator(&mut self) {}

    fn show_error(&mut self, message: &str) {
        self.line(&format!("error: {}", message));
    }

    fn clear_error(&mut self) {}
}
