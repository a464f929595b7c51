//! Codebase list card.

use crate::component::Component;
use crate::text::{pad_to_width, truncate_to_width, ELLIPSIS};

pub struct SourceCard {
    title: String,
    subtitle: String,
}

impl SourceCard {
    pub fn new(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

impl Component for SourceCard {
    fn render(&mut self, width: usize) -> Vec<String> {
        [
            format!("  📁 {}", self.title),
            format!("    {}", self.subtitle),
        ]
        .iter()
        .map(|line| pad_to_width(&truncate_to_width(line, width, ELLIPSIS), width))
        .collect()
    }
}
