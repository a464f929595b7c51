use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use credential_store::CredentialStore;
use jules_api::{JulesApiClient, Source};
use jules_manager::app::{ChatView, CodebaseView, DashboardTab, DashboardView, View, ViewEvent};
use jules_manager::commands::{parse_chat_input, ChatCommand, ChatInput, CHAT_HELP_TEXT};
use jules_manager::config::{EnvConfig, DEFAULT_RENDER_WIDTH};
use jules_manager::dispatcher::ActionDispatcher;
use jules_manager::feed::ActivityFeed;
use jules_manager::logging::init_logging;
use jules_manager::render::{
    render_chat, render_codebase, render_dashboard, session_card, source_card,
};
use jules_manager::repository::SessionRepository;
use jules_manager::runtime::{ViewController, ViewHandle};
use jules_manager::startup::{resolve_route_with_override, StartupRoute};
use jules_manager::JulesService;
use jules_view::Component;
use tokio::io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::info;

type InputLines = Lines<BufReader<Stdin>>;

#[derive(Debug, Parser)]
#[command(
    name = "jules-manager",
    version,
    about = "Browse Jules sessions and codebases, read activity logs, and drive sessions from the terminal"
)]
struct Cli {
    /// Override the API base URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Render width in columns.
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Per-request timeout. Defaults to the transport's own.
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Store an API key. Prompts when --key is not given.
    Login {
        #[arg(long)]
        key: Option<String>,
    },
    /// Forget the stored API key.
    Logout,
    /// Interactive dashboard.
    Dashboard {
        /// Start on the Codebases tab.
        #[arg(long)]
        codebases: bool,
    },
    /// List recent sessions.
    Sessions,
    /// List connected codebases.
    Sources,
    /// List the sessions of one codebase.
    Source { name: String },
    /// Start a session against a codebase.
    Create {
        source: String,
        prompt: String,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Open the chat for the new session.
        #[arg(long)]
        open: bool,
    },
    /// Print a session and its transcript.
    Show {
        session: String,
        /// Print the session as JSON instead.
        #[arg(long)]
        json: bool,
    },
    /// Interactive chat with a session.
    Chat {
        session: String,
        /// Refresh automatically every N seconds.
        #[arg(long)]
        poll_secs: Option<u64>,
    },
    /// Send one message to a session.
    Send { session: String, text: String },
    /// Approve the session's pending plan.
    Approve { session: String },
    /// Ask the agent to publish its changes to a new branch.
    Publish { session: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Back,
    Exit,
}

enum Wake {
    Line(Option<String>),
    Changed,
    Tick,
}

struct Navigator<'a> {
    controller: ViewController,
    input: &'a mut InputLines,
    width: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let env = EnvConfig::from_env();
    init_logging(&env.log_filter);

    let store = match &env.config_dir {
        Some(dir) => CredentialStore::open(dir),
        None => CredentialStore::open_default().context("locate credential store")?,
    };
    let width = cli.width.unwrap_or(DEFAULT_RENDER_WIDTH);
    let mut input = BufReader::new(stdin()).lines();

    let command = match cli.command {
        Some(Command::Login { key }) => return login(&store, key, &mut input).await,
        Some(Command::Logout) => {
            store.clear().context("clear stored API key")?;
            println!("Signed out.");
            return Ok(());
        }
        command => command,
    };

    let api_key = match resolve_route_with_override(&store, env.api_key.as_deref()) {
        StartupRoute::Dashboard { api_key } => api_key,
        StartupRoute::CredentialEntry if command.is_none() => {
            let api_key = prompt_for_key(&mut input).await?;
            store.save(&api_key).context("save API key")?;
            api_key
        }
        StartupRoute::CredentialEntry => {
            bail!("no API key stored; run `jules-manager login` or set JULES_API_KEY")
        }
    };

    let timeout = cli.timeout_secs.map(Duration::from_secs);
    let config = env.api_config(&api_key, cli.base_url.as_deref(), timeout);
    let client = JulesApiClient::new(config).context("build Jules API client")?;
    let service: Arc<dyn JulesService> = Arc::new(client);

    let mut nav = Navigator {
        controller: ViewController::new(Arc::clone(&service)),
        input: &mut input,
        width,
    };

    match command {
        None => nav.dashboard(DashboardTab::RecentSessions).await.map(|_| ()),
        Some(command) => run_command(command, service, &mut nav).await,
    }
}

async fn run_command(
    command: Command,
    service: Arc<dyn JulesService>,
    nav: &mut Navigator<'_>,
) -> Result<()> {
    let repository = SessionRepository::new(Arc::clone(&service));
    let dispatcher = ActionDispatcher::new(Arc::clone(&service));
    let width = nav.width;

    match command {
        Command::Login { .. } | Command::Logout => {}
        Command::Dashboard { codebases } => {
            let tab = if codebases {
                DashboardTab::Codebases
            } else {
                DashboardTab::RecentSessions
            };
            nav.dashboard(tab).await?;
        }
        Command::Sessions => {
            let sessions = repository.list_sessions().await.context("list sessions")?;
            let view = DashboardView {
                sessions,
                ..DashboardView::new()
            };
            draw(render_dashboard(&view, width));
        }
        Command::Sources => {
            let sources = repository.list_sources().await.context("list sources")?;
            if sources.is_empty() {
                println!("No codebases connected");
            }
            for source in &sources {
                draw(source_card(source).render(width));
            }
        }
        Command::Source { name } => {
            let source = find_source(&repository, &name).await?;
            let sessions = repository
                .list_sessions_for_source(&name)
                .await
                .with_context(|| format!("list sessions for {name}"))?;
            let mut view = CodebaseView::new(source);
            view.apply(ViewEvent::SessionsLoaded(sessions));
            draw(render_codebase(&view, width));
        }
        Command::Create {
            source,
            prompt,
            branch,
            title,
            open,
        } => {
            let created = repository
                .create_session(&prompt, &source, branch.as_deref(), title.as_deref())
                .await
                .context("create session")?;
            info!(session = %created.name, "created session");
            println!("Created {}", created.name);
            draw(session_card(&created).render(width));
            if open {
                nav.chat(&created.name, None).await?;
            }
        }
        Command::Show { session: name, json } => {
            let loaded = repository
                .get_session(&name)
                .await
                .with_context(|| format!("load session {name}"))?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&loaded).context("encode session")?
                );
                return Ok(());
            }
            let feed = ActivityFeed::new(service)
                .load(&name)
                .await
                .with_context(|| format!("load activities for {name}"))?;
            let mut view = ChatView::new(name);
            view.apply(ViewEvent::SessionLoaded(loaded));
            view.apply(ViewEvent::ActivitiesLoaded(feed));
            draw(render_chat(&view, width));
        }
        Command::Chat { session: name, poll_secs } => {
            nav.chat(&name, poll_secs).await?;
        }
        Command::Send { session: name, text } => {
            let feed = dispatcher
                .send_message(&name, &text)
                .await
                .context("send message")?;
            let mut view = ChatView::new(name);
            view.apply(ViewEvent::MessageSent(feed));
            draw(render_chat(&view, width));
        }
        Command::Approve { session: name } => {
            let (loaded, feed) = dispatcher
                .approve_plan(&name)
                .await
                .context("approve plan")?;
            let mut view = ChatView::new(name);
            view.apply(ViewEvent::PlanApproved {
                session: loaded,
                feed,
            });
            draw(render_chat(&view, width));
        }
        Command::Publish { session: name } => {
            let mut view = ChatView::new(name.clone());
            let branch = view.next_publish_branch();
            let feed = dispatcher
                .publish_to_branch(&name, &branch)
                .await
                .context("request publish")?;
            view.apply(ViewEvent::MessageSent(feed));
            view.set_notice(format!("Requested publish to {branch}"));
            draw(render_chat(&view, width));
        }
    }

    Ok(())
}

impl Navigator<'_> {
    async fn dashboard(&mut self, tab: DashboardTab) -> Result<Flow> {
        let mut view = DashboardView::new();
        view.select_tab(tab);
        let handle = ViewHandle::new(view);
        let _ = self.controller.refresh_dashboard(&handle);
        let mut poll = None;

        loop {
            handle.with_view(|view| draw(render_dashboard(view, self.width)));
            println!("[number] open  [t] switch tab  [r] refresh  [q] quit");

            let line = match wait(self.input, &handle, &mut poll).await? {
                Wake::Line(Some(line)) => line,
                Wake::Line(None) => return Ok(Flow::Exit),
                Wake::Changed | Wake::Tick => {
                    handle.drain_pending_events();
                    continue;
                }
            };

            match line.trim() {
                "" => {}
                "q" | "quit" | "/quit" => return Ok(Flow::Exit),
                "r" | "/refresh" => {
                    let _ = self.controller.refresh_dashboard(&handle);
                }
                "t" | "tab" => handle.with_view(|view| {
                    let next = match view.tab {
                        DashboardTab::RecentSessions => DashboardTab::Codebases,
                        DashboardTab::Codebases => DashboardTab::RecentSessions,
                    };
                    view.select_tab(next);
                }),
                other => {
                    let Some(target) = other.parse::<usize>().ok().and_then(|position| {
                        handle.with_view(|view| open_target(view, position))
                    }) else {
                        handle.with_view(|view| {
                            view.notice = Some(format!("Nothing to open at {other:?}"));
                        });
                        continue;
                    };

                    let flow = match target {
                        OpenTarget::Chat(name) => self.chat(&name, None).await?,
                        OpenTarget::Codebase(source) => self.codebase(source).await?,
                    };
                    if flow == Flow::Exit {
                        return Ok(Flow::Exit);
                    }
                    let _ = self.controller.refresh_dashboard(&handle);
                }
            }
        }
    }

    async fn codebase(&mut self, source: Source) -> Result<Flow> {
        let handle = ViewHandle::new(CodebaseView::new(source));
        let _ = self.controller.refresh_codebase(&handle);
        let mut poll = None;

        loop {
            if let Some(created) = handle.with_view(CodebaseView::take_created) {
                if self.chat(&created.name, None).await? == Flow::Exit {
                    return Ok(Flow::Exit);
                }
                let _ = self.controller.refresh_codebase(&handle);
            }

            handle.with_view(|view| draw(render_codebase(view, self.width)));
            println!("[number] open  [new <prompt>] start session  [r] refresh  [b] back");

            let line = match wait(self.input, &handle, &mut poll).await? {
                Wake::Line(Some(line)) => line,
                Wake::Line(None) => return Ok(Flow::Exit),
                Wake::Changed | Wake::Tick => {
                    handle.drain_pending_events();
                    continue;
                }
            };

            let line = line.trim();
            let new_prompt = line
                .strip_prefix("new")
                .filter(|rest| rest.is_empty() || rest.starts_with(' '));
            if let Some(prompt) = new_prompt {
                if let Err(error) = self.controller.create_session(&handle, prompt, None, None) {
                    handle.with_view(|view| view.notice = Some(error.user_message()));
                }
                continue;
            }

            match line {
                "" => {}
                "b" | "back" => return Ok(Flow::Back),
                "q" | "quit" | "/quit" => return Ok(Flow::Exit),
                "r" | "/refresh" => {
                    let _ = self.controller.refresh_codebase(&handle);
                }
                other => {
                    let name = other.parse::<usize>().ok().and_then(|position| {
                        handle.with_view(|view| {
                            position
                                .checked_sub(1)
                                .and_then(|index| view.sessions.get(index))
                                .map(|session| session.name.clone())
                        })
                    });
                    match name {
                        Some(name) => {
                            if self.chat(&name, None).await? == Flow::Exit {
                                return Ok(Flow::Exit);
                            }
                            let _ = self.controller.refresh_codebase(&handle);
                        }
                        None => handle.with_view(|view| {
                            view.notice = Some(format!("Nothing to open at {other:?}"));
                        }),
                    }
                }
            }
        }
    }

    async fn chat(&mut self, session_name: &str, poll_secs: Option<u64>) -> Result<Flow> {
        let handle = ViewHandle::new(ChatView::new(session_name));
        let _ = self.controller.refresh_chat(&handle);
        let mut poll = poll_secs.filter(|secs| *secs > 0).map(|secs| {
            let period = Duration::from_secs(secs);
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });

        loop {
            handle.with_view(|view| draw(render_chat(view, self.width)));

            let line = match wait(self.input, &handle, &mut poll).await? {
                Wake::Line(Some(line)) => line,
                Wake::Line(None) => return Ok(Flow::Exit),
                Wake::Changed => {
                    handle.drain_pending_events();
                    continue;
                }
                Wake::Tick => {
                    let _ = self.controller.refresh_chat(&handle);
                    continue;
                }
            };

            let command = match parse_chat_input(&line) {
                ChatInput::Empty => continue,
                ChatInput::Message(text) => {
                    if let Err(error) = self.controller.send_message(&handle, &text) {
                        handle.with_view(|view| view.set_notice(error.user_message()));
                    }
                    continue;
                }
                ChatInput::Command(command) => command,
            };

            match command {
                ChatCommand::Help => handle.with_view(|view| view.set_notice(CHAT_HELP_TEXT)),
                ChatCommand::Refresh => {
                    let _ = self.controller.refresh_chat(&handle);
                }
                ChatCommand::Approve => {
                    if handle.with_view(|view| view.show_plan_controls) {
                        let _ = self.controller.approve_plan(&handle);
                    } else {
                        handle.with_view(|view| view.set_notice("No plan is awaiting approval"));
                    }
                }
                ChatCommand::Publish => {
                    let (branch, _) = self.controller.publish(&handle);
                    handle.with_view(|view| {
                        view.set_notice(format!("Requested publish to {branch}"));
                    });
                }
                ChatCommand::Accept => {
                    let _ = self.controller.accept_review(&handle);
                }
                ChatCommand::Expand(target) => handle.with_view(|view| expand(view, target)),
                ChatCommand::Quit => return Ok(Flow::Back),
                ChatCommand::Unknown(command) => handle.with_view(|view| {
                    view.set_notice(format!("Unknown command {command}. {CHAT_HELP_TEXT}"));
                }),
            }
        }
    }
}

enum OpenTarget {
    Chat(String),
    Codebase(Source),
}

fn open_target(view: &DashboardView, position: usize) -> Option<OpenTarget> {
    let index = position.checked_sub(1)?;
    match view.tab {
        DashboardTab::RecentSessions => view
            .sessions
            .get(index)
            .map(|session| OpenTarget::Chat(session.name.clone())),
        DashboardTab::Codebases => view.sources.get(index).cloned().map(OpenTarget::Codebase),
    }
}

/// `/expand` takes a 1-based position or a message id.
fn expand(view: &mut ChatView, target: Option<String>) {
    let Some(target) = target else {
        view.set_notice("Usage: /expand <n|id>");
        return;
    };
    let id = match target.parse::<usize>() {
        Ok(position) => view.transcript.id_at(position).map(str::to_string),
        Err(_) => Some(target.clone()),
    };
    let toggled = id.and_then(|id| view.transcript.toggle(&id));
    if toggled.is_none() {
        view.set_notice(format!("Message {target} has nothing to expand"));
    }
}

async fn wait<V: View>(
    input: &mut InputLines,
    handle: &ViewHandle<V>,
    poll: &mut Option<Interval>,
) -> Result<Wake> {
    tokio::select! {
        line = input.next_line() => Ok(Wake::Line(line.context("read stdin")?)),
        _ = handle.changed() => Ok(Wake::Changed),
        _ = tick(poll) => Ok(Wake::Tick),
    }
}

async fn tick(poll: &mut Option<Interval>) {
    match poll {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn find_source(repository: &SessionRepository, name: &str) -> Result<Source> {
    let sources = repository.list_sources().await.context("list sources")?;
    Ok(sources
        .into_iter()
        .find(|source| source.name == name)
        .unwrap_or_else(|| Source {
            name: name.to_string(),
            id: None,
            github_repo: None,
        }))
}

async fn login(store: &CredentialStore, key: Option<String>, input: &mut InputLines) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompt_for_key(input).await?,
    };
    store.save(&key).context("save API key")?;
    println!("API key saved to {}", store.path().display());
    Ok(())
}

async fn prompt_for_key(input: &mut InputLines) -> Result<String> {
    loop {
        println!("Enter your Jules API key:");
        let Some(line) = input.next_line().await.context("read API key")? else {
            bail!("no API key entered");
        };
        let key = line.trim();
        if !key.is_empty() {
            return Ok(key.to_string());
        }
        println!("The API key must not be empty.");
    }
}

fn draw(lines: Vec<String>) {
    println!();
    for line in lines {
        println!("{line}");
    }
}
