//! Terminal user interface components and state management.
//!
//! This module contains the main TUI loop, `AppState`, event handling,
//! and all UI widgets using Ratatui.

pub mod component;
pub mod handlers;
pub mod navigation;
pub mod notice;
pub mod status_bar;
pub mod task_creation;
pub mod task_list;
pub mod theme;
pub mod wizard_view;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::constants::{APP_NAME, EMAIL_VERIFICATION_PAGE, TASKS_PAGE};
use crate::models::ProviderCatalog;
use crate::shortcuts::ShortcutRegistry;
use crate::tasks::{TaskQueue, TaskRunner};
use crate::wizard::{Transcript, WizardController};

// Re-export TUI components
pub use component::Component;
pub use navigation::{PageHost, PAGES};
pub use notice::Notice;
pub use status_bar::StatusBar;
pub use task_creation::{TaskCreationEvent, TaskCreationForm};
pub use task_list::{TaskListEvent, TaskListView};
pub use theme::Theme;

/// Application state shared by the event loop and the renderer.
pub struct AppState {
    /// Loaded configuration
    pub config: Config,
    /// Current UI theme
    pub theme: Theme,
    /// Key binding table
    pub registry: ShortcutRegistry,
    /// The email verification wizard
    pub wizard: WizardController,
    /// Rendered wizard transcript
    pub transcript: Transcript,
    /// Pages, views and the task creation form
    pub pages: PageHost,
    /// Transient message overlay
    pub notice: Notice,
    /// Submitted tasks
    pub queue: TaskQueue,
    /// Task list page
    pub task_list: TaskListView,
    /// Status bar message
    pub status_message: String,
    /// Set once the user asked to quit
    pub should_quit: bool,
}

impl AppState {
    /// Creates the application state with tasks run by `runner`.
    pub fn new(
        config: Config,
        catalog: ProviderCatalog,
        form: TaskCreationForm,
        runner: Arc<dyn TaskRunner>,
    ) -> Self {
        let theme = Theme::from_mode(config.ui.theme_mode);
        let wizard = WizardController::new(catalog, config.wizard_settings());

        Self {
            config,
            theme,
            registry: ShortcutRegistry::new(),
            wizard,
            transcript: Transcript::new(),
            pages: PageHost::new(form),
            notice: Notice::new(),
            queue: TaskQueue::with_runner(runner),
            task_list: TaskListView::new(),
            status_message: String::new(),
            should_quit: false,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    /// Pulls the latest task records into the task list.
    pub fn refresh_tasks(&mut self) {
        self.task_list.set_records(self.queue.records());
    }
}

/// Setup terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Window title shown while `page` is active.
#[must_use]
pub fn window_title(page: &str) -> String {
    format!("{APP_NAME} | {page}")
}

/// Main event loop
pub fn run_tui(
    state: &mut AppState,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let mut titled_page = "";

    loop {
        // Apply theme based on user preference (Auto detects OS, Dark/Light are explicit)
        state.theme = Theme::from_mode(state.config.ui.theme_mode);

        if titled_page != state.pages.active() {
            titled_page = state.pages.active();
            execute!(terminal.backend_mut(), SetTitle(window_title(titled_page)))
                .context("Failed to set window title")?;
        }

        state.refresh_tasks();

        // Render current state
        terminal.draw(|f| render(f, state))?;

        // Poll for events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handlers::handle_key_event(state, key)? {
                    break; // User quit
                }
            }
        }

        // Check if should quit
        if state.should_quit {
            break;
        }
    }

    info!("Quit requested");
    Ok(())
}

/// Render the UI
fn render(f: &mut Frame, state: &AppState) {
    let theme = &state.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(4),
        ])
        .split(f.area());

    render_tabs(f, chunks[0], state);

    match state.pages.active() {
        EMAIL_VERIFICATION_PAGE => {
            wizard_view::render(f, chunks[1], &state.transcript, &state.wizard, theme);
        }
        TASKS_PAGE => state.task_list.render(f, chunks[1], theme),
        _ => state.pages.form().render(f, chunks[1], theme),
    }

    StatusBar::render(f, chunks[2], state, theme);
    state.notice.render(f, f.area(), theme);
}

/// Render the page tabs
fn render_tabs(f: &mut Frame, area: Rect, state: &AppState) {
    let theme = &state.theme;
    let mut spans = Vec::new();

    for (i, page) in PAGES.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" | ", Style::default().fg(theme.text_muted)));
        }
        let style = if *page == state.pages.active() {
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.inactive)
        };
        spans.push(Span::styled(*page, style));
    }

    let border = if state.pages.navigation_focused() {
        theme.accent
    } else {
        theme.primary
    };
    let tabs = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {APP_NAME} "))
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(tabs, area);
}
