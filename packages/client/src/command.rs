//! Input command parsing.

/// What the user asked for on one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send a chat message
    Say(String),
    /// Print locally stored messages
    History,
    /// Disconnect and exit
    Quit,
    /// Nothing to do
    Empty,
}

impl Command {
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "" => Command::Empty,
            "/quit" | "/exit" => Command::Quit,
            "/history" => Command::History,
            _ => Command::Say(input.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        // テスト項目: 入力行がコマンドに変換される
        // then (期待する結果):
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse(" /exit "), Command::Quit);
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("hi there"), Command::Say("hi there".to_string()));
    }
}
