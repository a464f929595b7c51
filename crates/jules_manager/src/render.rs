//! Turns view state into terminal lines.

use jules_api::{Session, SessionState, Source};
use jules_view::{
    BubbleSide, ChatBubble, Component, Container, Header, SessionCard, SourceCard, Text,
};

use crate::app::{
    ChatView, CodebaseView, DashboardTab, DashboardView, DASHBOARD_TITLE, EMPTY_CODEBASE_NOTICE,
};
use crate::transcript::{Author, TranscriptMessage};

const REFRESHING_STATUS: &str = "↻ refreshing";

pub fn state_icon(state: &SessionState) -> &'static str {
    match state {
        SessionState::Completed => "✅",
        SessionState::Failed => "❌",
        SessionState::AwaitingUserFeedback => "🟠",
        SessionState::AwaitingPlanApproval => "📋",
        SessionState::Other(_) | SessionState::Unspecified => "⏳",
    }
}

/// Repository label for a session card: last segment of its source.
pub fn session_repo_label(session: &Session) -> &str {
    session
        .source()
        .and_then(|source| source.rsplit('/').next())
        .filter(|segment| !segment.is_empty())
        .unwrap_or("Unknown Source")
}

pub fn session_card(session: &Session) -> SessionCard {
    SessionCard::new(
        state_icon(&session.state),
        session.display_title(),
        session_repo_label(session),
        session.state.as_str(),
    )
}

pub fn source_card(source: &Source) -> SourceCard {
    let subtitle = match &source.github_repo {
        Some(_) => format!("Branch: {}", source.default_branch().unwrap_or("default")),
        None => format!("Source ID: {}", source.name),
    };
    SourceCard::new(source.display_name(), subtitle)
}

fn header(title: &str, refreshing: bool) -> Header {
    let header = Header::new(title);
    if refreshing {
        header.with_status(REFRESHING_STATUS)
    } else {
        header
    }
}

fn push_notice(screen: &mut Container, notice: Option<&str>) {
    if let Some(notice) = notice {
        screen.add_child(Box::new(Text::new(format!("! {notice}"))));
    }
}

fn numbered<C: Component + 'static>(index: usize, card: C) -> Box<dyn Component> {
    Box::new(NumberedRow { index, card })
}

/// Prefixes the first line of a card with its 1-based list position.
struct NumberedRow<C> {
    index: usize,
    card: C,
}

impl<C: Component> Component for NumberedRow<C> {
    fn render(&mut self, width: usize) -> Vec<String> {
        let label = format!("{:>3}.", self.index);
        let inner = width.saturating_sub(label.len());
        let mut lines = self.card.render(inner);
        for (row, line) in lines.iter_mut().enumerate() {
            let prefix = if row == 0 {
                label.clone()
            } else {
                " ".repeat(label.len())
            };
            line.insert_str(0, &prefix);
        }
        lines
    }
}

pub fn render_dashboard(view: &DashboardView, width: usize) -> Vec<String> {
    let mut screen = Container::new();
    let titles = DashboardTab::ALL.iter().map(|tab| tab.title());
    screen.add_child(Box::new(
        header(DASHBOARD_TITLE, view.refreshing).with_tabs(titles, view.tab.index()),
    ));
    push_notice(&mut screen, view.notice.as_deref());

    match view.tab {
        DashboardTab::RecentSessions => {
            if view.sessions.is_empty() && !view.refreshing {
                screen.add_child(Box::new(Text::new("No sessions yet")));
            }
            for (index, session) in view.sessions.iter().enumerate() {
                screen.add_child(numbered(index + 1, session_card(session)));
            }
        }
        DashboardTab::Codebases => {
            if view.sources.is_empty() && !view.refreshing {
                screen.add_child(Box::new(Text::new("No codebases connected")));
            }
            for (index, source) in view.sources.iter().enumerate() {
                screen.add_child(numbered(index + 1, source_card(source)));
            }
        }
    }

    screen.render(width)
}

pub fn render_codebase(view: &CodebaseView, width: usize) -> Vec<String> {
    let mut screen = Container::new();
    let subtitle = match view.source.default_branch() {
        Some(branch) => format!("Branch: {branch}"),
        None => format!("Source ID: {}", view.source.name),
    };
    screen.add_child(Box::new(
        header(&view.source.display_name(), view.refreshing).with_subtitle(subtitle),
    ));
    push_notice(&mut screen, view.notice.as_deref());

    if view.sessions.is_empty() && !view.refreshing {
        screen.add_child(Box::new(Text::new(EMPTY_CODEBASE_NOTICE)));
    }
    for (index, session) in view.sessions.iter().enumerate() {
        screen.add_child(numbered(index + 1, session_card(session)));
    }

    screen.render(width)
}

fn message_bubble(view: &ChatView, position: usize, message: &TranscriptMessage) -> ChatBubble {
    let side = match message.author {
        Author::User => BubbleSide::Right,
        Author::Agent => BubbleSide::Left,
    };
    let text = view
        .transcript
        .display_text(&message.id)
        .map(|text| text.into_owned())
        .unwrap_or_else(|| message.text.clone());
    let label = format!("{} #{position}", message.author.label());
    let bubble = ChatBubble::new(label, text, side);

    if !message.is_truncatable() {
        return bubble;
    }
    if view.transcript.is_expanded(&message.id) {
        bubble.with_footer(format!("[-] /expand {position} to collapse"))
    } else {
        bubble.with_footer(format!("[+] /expand {position} to show more"))
    }
}

pub fn render_chat(view: &ChatView, width: usize) -> Vec<String> {
    let mut screen = Container::with_gap(1);
    let title = view
        .session
        .as_ref()
        .map(|session| format!("{} {}", state_icon(&session.state), session.display_title()))
        .unwrap_or_else(|| "Chat".to_string());
    screen.add_child(Box::new(
        header(&title, view.refreshing).with_subtitle(view.subtitle()),
    ));
    push_notice(&mut screen, view.notice.as_deref());

    if view.transcript.is_empty() && !view.refreshing {
        screen.add_child(Box::new(Text::new("No messages yet")));
    }
    for (index, message) in view.transcript.messages().iter().enumerate() {
        screen.add_child(Box::new(message_bubble(view, index + 1, message)));
    }

    if view.show_plan_controls {
        let mut lines = vec!["📋 Plan awaiting approval. Type /approve to approve it.".to_string()];
        if let Some(plan) = &view.plan {
            for (index, step) in plan.steps.iter().enumerate() {
                lines.push(format!("  {}. {}", index + 1, step.title));
                let description = step.description.as_deref().unwrap_or_default();
                if !description.is_empty() {
                    lines.push(format!("     {description}"));
                }
            }
        }
        screen.add_child(Box::new(Text::new(lines.join("\n"))));
    }

    screen.render(width)
}
