//! Chat bubble widget for transcript messages.

use crate::component::Component;
use crate::text::{pad_to_width, truncate_to_width, visible_width, wrap_text, ELLIPSIS};

/// Which edge of the transcript a bubble hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BubbleSide {
    /// Agent messages.
    Left,
    /// User messages.
    Right,
}

/// Bordered message bubble. The label sits in the top border and an
/// optional footer (the expand/collapse affordance) sits above the bottom.
pub struct ChatBubble {
    label: String,
    text: String,
    side: BubbleSide,
    footer: Option<String>,
}

/// Share of the available width a bubble may occupy, in percent.
const MAX_WIDTH_PERCENT: usize = 80;
const MIN_INNER_WIDTH: usize = 8;

impl ChatBubble {
    pub fn new(label: impl Into<String>, text: impl Into<String>, side: BubbleSide) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
            side,
            footer: None,
        }
    }

    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }
}

impl Component for ChatBubble {
    fn render(&mut self, width: usize) -> Vec<String> {
        // Border plus one column of padding on each side.
        let chrome = 4;
        let ceiling = width.saturating_sub(chrome).max(1);
        let max_inner = (width * MAX_WIDTH_PERCENT / 100)
            .saturating_sub(chrome)
            .max(MIN_INNER_WIDTH)
            .min(ceiling);

        let body = wrap_text(&self.text, max_inner);
        let footer = self
            .footer
            .as_deref()
            .map(|footer| truncate_to_width(footer, max_inner, ELLIPSIS));
        // The label shares the top border with "─ " and one trailing space.
        let label = truncate_to_width(&self.label, max_inner.saturating_sub(1), ELLIPSIS);
        let label_width = visible_width(&label) + 3;
        let inner = body
            .iter()
            .chain(footer.iter())
            .map(|line| visible_width(line))
            .chain(std::iter::once(label_width))
            .max()
            .unwrap_or(0)
            .min(max_inner);

        let top_fill = (inner + 2).saturating_sub(visible_width(&label) + 3);
        let mut lines = vec![format!("╭─ {label} {}╮", "─".repeat(top_fill))];
        for line in &body {
            lines.push(format!("│ {} │", pad_to_width(line, inner)));
        }
        if let Some(footer) = &footer {
            lines.push(format!("│ {} │", pad_to_width(footer, inner)));
        }
        lines.push(format!("╰{}╯", "─".repeat(inner + 2)));

        if self.side == BubbleSide::Right {
            let indent = width.saturating_sub(inner + chrome);
            let margin = " ".repeat(indent);
            for line in lines.iter_mut() {
                line.insert_str(0, &margin);
            }
        }

        lines
    }
}
