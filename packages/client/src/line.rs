//! Received line classification and outgoing line formatting.
//!
//! The wire carries no envelope, so a line containing `": "` is treated as a
//! chat line `"<sender>: <text>"` and anything else as a system notice.

/// A line received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedLine {
    Chat { sender: String, text: String },
    Notice(String),
}

/// Split a received line into chat or notice.
pub fn classify_line(line: &str) -> ReceivedLine {
    match line.split_once(": ") {
        Some((sender, text)) => ReceivedLine::Chat {
            sender: sender.to_string(),
            text: text.to_string(),
        },
        None => ReceivedLine::Notice(line.to_string()),
    }
}

/// Format an outgoing chat line.
pub fn format_chat_line(name: &str, text: &str) -> String {
    format!("{}: {}", name, text)
}

/// Render a received line for the terminal.
pub fn render(line: &ReceivedLine) -> String {
    match line {
        ReceivedLine::Chat { sender, text } => format!("[{}] {}", sender, text),
        ReceivedLine::Notice(notice) => format!("*** {} ***", notice),
    }
}
