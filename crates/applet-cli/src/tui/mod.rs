use crate::desktop::Opener;
use crate::logging::LogBuffer;
use anyhow::Context;
use applet_core::account::Account;
use applet_core::client::RpcClient;
use applet_core::config::AppConfig;
use applet_core::model::ServerRepo;
use applet_server::RepoSource;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

mod app_core;
mod dialogs;
mod draw;
mod handle;
mod helpers;
mod repo_tree;
#[cfg(test)]
mod tests;

use dialogs::*;
use helpers::*;
use repo_tree::*;

pub(crate) use helpers::folder_name;

const LOG_PANEL_HEIGHT: u16 = 7;
const LOG_PANEL_BORDER_HEIGHT: u16 = 2;

/// Everything the terminal UI needs, built by the caller.
pub struct TuiContext {
    pub client: RpcClient,
    pub server: Option<Box<dyn RepoSource>>,
    pub account: Option<Account>,
    pub opener: Box<dyn Opener>,
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub download_dir: PathBuf,
    pub log_buffer: LogBuffer,
}

pub fn run_tui(context: TuiContext) -> anyhow::Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )
    .context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    info!(connected = context.client.is_connected(), "Starting TUI");
    let result = run_app(&mut terminal, context);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = &result {
        error!(error = %err, "TUI exited with error");
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    context: TuiContext,
) -> anyhow::Result<()> {
    let mut app = TuiApp::new(context);
    app.refresh_all();
    let tick_rate = Duration::from_millis(200);
    debug!(
        tick_rate_ms = tick_rate.as_millis(),
        "TUI event loop started"
    );

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(tick_rate)? {
            let quit = match event::read()? {
                Event::Key(key) => app.handle_key(key)?,
                Event::Mouse(mouse) => {
                    app.handle_mouse(mouse);
                    false
                }
                Event::FocusLost => {
                    app.tree.hide();
                    false
                }
                Event::FocusGained => {
                    app.tree.show();
                    false
                }
                _ => false,
            };
            if quit {
                info!("Leaving TUI");
                return Ok(());
            }
        }

        app.tick();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum View {
    Tree,
    Download,
    CloneTasks,
    Details,
    Message,
}

struct TuiApp {
    client: RpcClient,
    server: Option<Box<dyn RepoSource>>,
    account: Option<Account>,
    opener: Box<dyn Opener>,
    config: AppConfig,
    config_path: PathBuf,
    download_dir: PathBuf,
    log_buffer: LogBuffer,
    tree: RepoTreeView,
    view: View,
    server_repos: Vec<ServerRepo>,
    status: String,
    message: String,
    download: Option<DownloadDialog>,
    clone_tasks: CloneTasksDialog,
    details: Vec<String>,
    tree_area: Rect,
    tree_scroll: usize,
    last_refresh: Instant,
}
