//! Terminal line commands.

use crate::controller::ClientEvent;

pub const USAGE: &str =
    "commands: more | refresh | retry | search <term> | post <name> | <content> | quit";

/// Maps one stdin line to an event. Unknown input yields `None`.
///
/// - empty line or `more`: load the next page
/// - `refresh`, `retry`, `quit`
/// - `search <term>`
/// - `post <name> | <content>`
pub fn parse_line(line: &str) -> Option<ClientEvent> {
    let line = line.trim();
    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "" | "more" => Some(ClientEvent::SentinelVisible),
        "refresh" => Some(ClientEvent::Refresh),
        "retry" => Some(ClientEvent::Retry),
        "quit" | "exit" => Some(ClientEvent::Quit),
        "search" => Some(ClientEvent::Search(rest.to_string())),
        "post" => {
            let (name, content) = rest.split_once('|').unwrap_or((rest, ""));
            Some(ClientEvent::Submit {
                name: name.trim().to_string(),
                content: content.trim().to_string(),
            })
        }
        _ => None,
    }
}
