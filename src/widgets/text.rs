//! Text widget.

use crate::component::Component;
use crate::text::{pad_to_width, wrap_text};

/// Word-wrapped paragraph with horizontal and vertical padding.
pub struct Text {
    text: String,
    padding_x: usize,
    padding_y: usize,
    cached: Option<(usize, Vec<String>)>,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_padding(text, 0, 0)
    }

    pub fn with_padding(text: impl Into<String>, padding_x: usize, padding_y: usize) -> Self {
        Self {
            text: text.into(),
            padding_x,
            padding_y,
            cached: None,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.invalidate();
    }
}

impl Component for Text {
    fn render(&mut self, width: usize) -> Vec<String> {
        if let Some((cached_width, lines)) = &self.cached {
            if *cached_width == width {
                return lines.clone();
            }
        }

        if self.text.trim().is_empty() {
            self.cached = Some((width, Vec::new()));
            return Vec::new();
        }

        let content_width = width.saturating_sub(self.padding_x * 2).max(1);
        let margin = " ".repeat(self.padding_x);
        let empty_line = " ".repeat(width);

        let mut lines = vec![empty_line.clone(); self.padding_y];
        for line in wrap_text(&self.text, content_width) {
            lines.push(pad_to_width(&format!("{margin}{line}{margin}"), width));
        }
        lines.extend(std::iter::repeat(empty_line).take(self.padding_y));

        self.cached = Some((width, lines.clone()));
        lines
    }

    fn invalidate(&mut self) {
        self.cached = None;
    }
}
