//! Line-oriented terminal views for jules-manager.
//!
//! Components render to plain `Vec<String>` lines at a given column width;
//! the caller owns the terminal and decides when to print.
//!
//! # Public API Overview
//! - [`Component`] is the render contract every widget implements.
//! - Widgets: [`Header`], [`SessionCard`], [`SourceCard`], [`ChatBubble`],
//!   [`Text`], and [`Container`] for stacking them.
//! - Width helpers that understand graphemes and emoji.

pub mod component;
pub mod text;
pub mod widgets;

pub use crate::component::Component;
pub use crate::text::{
    pad_to_width, truncate_chars, truncate_to_width, visible_width, wrap_text, ELLIPSIS,
};
pub use crate::widgets::{
    BubbleSide, ChatBubble, Container, Header, SessionCard, SourceCard, Text,
};

/// Render `component` at `width` and join the lines with newlines.
pub fn render_to_string(component: &mut dyn Component, width: usize) -> String {
    component.render(width).join("\n")
}
