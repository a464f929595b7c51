#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Help,
    Refresh,
    Approve,
    Publish,
    Accept,
    /// `/expand <n|id>`; `None` when the argument is missing.
    Expand(Option<String>),
    Quit,
    Unknown(String),
}

/// One line typed into the chat prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Empty,
    Command(ChatCommand),
    Message(String),
}

pub const CHAT_HELP_TEXT: &str =
    "Commands: /help, /refresh, /approve, /publish, /accept, /expand <n|id>, /quit. Anything else is sent as a message.";

pub fn parse_chat_command(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let command = parts.next().unwrap_or(trimmed).to_string();

    let parsed = match command.as_str() {
        "/help" => ChatCommand::Help,
        "/refresh" => ChatCommand::Refresh,
        "/approve" => ChatCommand::Approve,
        "/publish" => ChatCommand::Publish,
        "/accept" => ChatCommand::Accept,
        "/expand" => ChatCommand::Expand(parts.next().map(str::to_string)),
        "/quit" => ChatCommand::Quit,
        _ => ChatCommand::Unknown(command),
    };

    Some(parsed)
}

pub fn parse_chat_input(input: &str) -> ChatInput {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return ChatInput::Empty;
    }
    match parse_chat_command(trimmed) {
        Some(command) => ChatInput::Command(command),
        None => ChatInput::Message(trimmed.to_string()),
    }
}
