//! Built-in components.

pub mod chat_bubble;
pub mod container;
pub mod header;
pub mod session_card;
pub mod source_card;
pub mod text;

pub use chat_bubble::{BubbleSide, ChatBubble};
pub use container::Container;
pub use header::Header;
pub use session_card::SessionCard;
pub use source_card::SourceCard;
pub use text::Text;
