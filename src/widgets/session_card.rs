//! Session list card.

use crate::component::Component;
use crate::text::{pad_to_width, truncate_to_width, ELLIPSIS};

/// One row of the session list: status icon and title on the first line,
/// repository and raw state below.
pub struct SessionCard {
    icon: String,
    title: String,
    repo: String,
    state: String,
}

impl SessionCard {
    pub fn new(
        icon: impl Into<String>,
        title: impl Into<String>,
        repo: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        Self {
            icon: icon.into(),
            title: title.into(),
            repo: repo.into(),
            state: state.into(),
        }
    }
}

impl Component for SessionCard {
    fn render(&mut self, width: usize) -> Vec<String> {
        let headline = format!("  {} {}", self.icon, self.title);
        let detail = if self.state.is_empty() {
            format!("    {}", self.repo)
        } else {
            format!("    {} · {}", self.repo, self.state)
        };

        [headline, detail]
            .iter()
            .map(|line| pad_to_width(&truncate_to_width(line, width, ELLIPSIS), width))
            .collect()
    }
}
