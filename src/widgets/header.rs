//! Screen header with title, optional subtitle, and tab strip.

use crate::component::Component;
use crate::text::{pad_to_width, truncate_to_width, visible_width, ELLIPSIS};

/// Title bar. Status text (for example a refresh indicator) is right-aligned
/// on the title line when it fits.
pub struct Header {
    title: String,
    subtitle: Option<String>,
    status: Option<String>,
    tabs: Vec<String>,
    active_tab: usize,
}

impl Header {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            status: None,
            tabs: Vec::new(),
            active_tab: 0,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_tabs<I, S>(mut self, tabs: I, active_tab: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tabs = tabs.into_iter().map(Into::into).collect();
        self.active_tab = active_tab;
        self
    }

    fn title_line(&self, width: usize) -> String {
        let title = match &self.subtitle {
            Some(subtitle) => format!("{} · {subtitle}", self.title),
            None => self.title.clone(),
        };
        let Some(status) = &self.status else {
            return truncate_to_width(&title, width, ELLIPSIS);
        };

        let status_width = visible_width(status);
        if status_width + 1 >= width {
            return truncate_to_width(&title, width, ELLIPSIS);
        }
        let title = truncate_to_width(&title, width - status_width - 1, ELLIPSIS);
        let gap = width - status_width - visible_width(&title);
        format!("{title}{}{status}", " ".repeat(gap))
    }

    fn tab_line(&self) -> String {
        self.tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| {
                if index == self.active_tab {
                    format!("[{tab}]")
                } else {
                    format!(" {tab} ")
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Component for Header {
    fn render(&mut self, width: usize) -> Vec<String> {
        let mut lines = vec![pad_to_width(&self.title_line(width), width)];
        if !self.tabs.is_empty() {
            let tabs = truncate_to_width(&self.tab_line(), width, ELLIPSIS);
            lines.push(pad_to_width(&tabs, width));
        }
        lines.push("─".repeat(width));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::Header;
    use crate::component::Component;
    use crate::text::visible_width;

    #[test]
    fn header_renders_title_and_rule() {
        let mut header = Header::new("Jules Dashboard");
        let lines = header.render(20);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].trim_end(), "Jules Dashboard");
        assert_eq!(lines[1], "─".repeat(20));
    }

    #[test]
    fn active_tab_is_bracketed() {
        let mut header =
            Header::new("Jules Dashboard").with_tabs(["Recent Sessions", "Codebases"], 1);
        let lines = header.render(40);

        assert_eq!(lines[1].trim_end(), " Recent Sessions  [Codebases]");
    }

    #[test]
    fn status_is_right_aligned() {
        let mut header = Header::new("Chat").with_subtitle("abc").with_status("refreshing");
        let lines = header.render(30);

        assert_eq!(visible_width(&lines[0]), 30);
        assert!(lines[0].starts_with("Chat · abc"));
        assert!(lines[0].ends_with("refreshing"));
    }
}
