use super::*;
use applet_core::config::Settings;
use applet_core::procedures as proc;
use applet_core::rpc::{RpcArg, RpcError, RpcTransport};
use applet_server::models::DownloadInfo;
use crossterm::event::{KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;
use url::Url;

#[derive(Clone, Default)]
struct Daemon {
    replies: Rc<RefCell<HashMap<&'static str, Result<Value, (i64, &'static str)>>>>,
    calls: Rc<RefCell<Vec<(String, Vec<RpcArg>)>>>,
}

impl Daemon {
    fn reply(&self, procedure: &'static str, value: Value) {
        self.replies.borrow_mut().insert(procedure, Ok(value));
    }

    fn fail(&self, procedure: &'static str, code: i64, message: &'static str) {
        self.replies
            .borrow_mut()
            .insert(procedure, Err((code, message)));
    }

    fn called(&self, procedure: &str) -> Option<Vec<RpcArg>> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(name, _)| name == procedure)
            .map(|(_, args)| args.clone())
    }
}

struct FakeTransport {
    service: &'static str,
    daemon: Daemon,
}

impl RpcTransport for FakeTransport {
    fn service(&self) -> &str {
        self.service
    }

    fn call(&mut self, procedure: &str, args: &[RpcArg]) -> Result<Value, RpcError> {
        self.daemon
            .calls
            .borrow_mut()
            .push((procedure.to_string(), args.to_vec()));
        match self.daemon.replies.borrow().get(procedure) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err((code, message))) => Err(RpcError::Remote {
                code: *code,
                message: message.to_string(),
            }),
            None => Ok(Value::Null),
        }
    }
}

struct FakeSource {
    repos: Vec<ServerRepo>,
}

impl RepoSource for FakeSource {
    fn list_repos(&self) -> anyhow::Result<Vec<ServerRepo>> {
        Ok(self.repos.clone())
    }

    fn download_info(&self, repo_id: &str) -> anyhow::Result<DownloadInfo> {
        Ok(serde_json::from_value(json!({
            "repo_id": repo_id,
            "repo_name": "Beta",
            "relay_id": "relay-1",
            "relay_addr": "10.0.0.1",
            "relay_port": 10001,
            "email": "me@example.com",
            "token": "repo-token",
            "encrypted": false
        }))?)
    }
}

#[derive(Clone, Default)]
struct RecordingOpener {
    opened: Rc<RefCell<Vec<String>>>,
}

impl Opener for RecordingOpener {
    fn open_folder(&self, path: &Path) -> anyhow::Result<()> {
        self.opened.borrow_mut().push(path.display().to_string());
        Ok(())
    }

    fn open_url(&self, url: &Url) -> anyhow::Result<()> {
        self.opened.borrow_mut().push(url.to_string());
        Ok(())
    }
}

fn server_repo(id: &str, name: &str) -> ServerRepo {
    ServerRepo {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        owner: "me@example.com".to_string(),
        encrypted: false,
        size: 2048,
        mtime: 0,
        category: applet_core::model::RepoCategory::Mine,
    }
}

struct Fixture {
    app: TuiApp,
    daemon: Daemon,
    opened: Rc<RefCell<Vec<String>>>,
    tmp: TempDir,
}

/// Rows after refresh: 0 My Libraries, 1 Alpha (synced), 2 Beta (remote)
fn fixture(with_account: bool) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let daemon = Daemon::default();
    daemon.reply(
        proc::GET_REPO_LIST,
        json!([{"id": "a", "name": "Alpha", "worktree": "/home/me/Alpha", "auto_sync": 1}]),
    );
    daemon.reply(proc::ENABLE_AUTO_SYNC, json!(0));
    daemon.reply(proc::DISABLE_AUTO_SYNC, json!(0));
    daemon.reply(proc::DOWNLOAD, json!("a-task"));
    let client = RpcClient::with_transports(
        Box::new(FakeTransport {
            service: proc::SYNC_SERVICE,
            daemon: daemon.clone(),
        }),
        Box::new(FakeTransport {
            service: proc::PEER_SERVICE,
            daemon: daemon.clone(),
        }),
        Settings::default(),
    );
    let opener = RecordingOpener::default();
    let opened = opener.opened.clone();
    let account = with_account.then(|| {
        Account::new("https://cloud.example.com", "me@example.com", "secret").unwrap()
    });
    let server: Option<Box<dyn RepoSource>> = with_account.then(|| {
        Box::new(FakeSource {
            repos: vec![server_repo("a", "Alpha"), server_repo("b", "Beta")],
        }) as Box<dyn RepoSource>
    });
    let mut app = TuiApp::new(TuiContext {
        client,
        server,
        account,
        opener: Box::new(opener),
        config: AppConfig::default(),
        config_path: tmp.path().join("config.json"),
        download_dir: tmp.path().to_path_buf(),
        log_buffer: LogBuffer::new(50),
    });
    app.refresh_all();
    Fixture {
        app,
        daemon,
        opened,
        tmp,
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

fn press(app: &mut TuiApp, code: KeyCode) -> bool {
    app.handle_key(key(code)).unwrap()
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

/// Tree drawn at 0,0 with a border, so terminal row `n + 1` is tree row `n`.
fn place_tree(app: &mut TuiApp) {
    app.tree_area = Rect::new(0, 0, 60, 12);
    app.tree_scroll = 0;
}

#[test]
fn refresh_merges_server_and_daemon_repos() {
    let Fixture { app, .. } = fixture(true);
    assert_eq!(app.tree.model().row_count(), 3);
    let alpha = app.tree.model().repo(TreeIndex::Repo(0, 0)).unwrap();
    assert!(alpha.has_local_copy());
    assert_eq!(
        alpha.local_repo().unwrap().sync_info.state,
        "waiting for sync"
    );
}

#[test]
fn open_folder_key_opens_local_worktree() {
    let Fixture {
        mut app, opened, ..
    } = fixture(true);
    app.tree.select_row(Some(1));
    press(&mut app, KeyCode::Char('o'));
    assert_eq!(opened.borrow().as_slice(), ["/home/me/Alpha"]);
}

#[test]
fn view_on_web_opens_repo_page() {
    let Fixture {
        mut app, opened, ..
    } = fixture(true);
    app.tree.select_row(Some(2));
    press(&mut app, KeyCode::Char('w'));
    assert_eq!(
        opened.borrow().as_slice(),
        ["https://cloud.example.com/repo/b"]
    );
}

#[test]
fn view_on_web_without_account_does_nothing() {
    let Fixture {
        mut app, opened, ..
    } = fixture(false);
    app.tree.select_row(Some(1));
    press(&mut app, KeyCode::Char('w'));
    assert!(opened.borrow().is_empty());
    assert_eq!(app.status, "No account configured");
}

#[test]
fn download_hands_request_to_daemon_and_shows_tasks() {
    let Fixture {
        mut app,
        daemon,
        tmp,
        ..
    } = fixture(true);
    app.tree.select_row(Some(2));
    press(&mut app, KeyCode::Char('d'));
    assert_eq!(app.view, View::Download);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.view, View::CloneTasks);
    assert!(app.download.is_none());
    let args = daemon.called(proc::DOWNLOAD).expect("download sent");
    assert_eq!(args[0], RpcArg::str("b"));
    let worktree = tmp.path().join("Beta").display().to_string();
    assert!(args.contains(&RpcArg::str(worktree)));
}

#[test]
fn download_into_existing_folder_is_refused() {
    let Fixture {
        mut app,
        daemon,
        tmp,
        ..
    } = fixture(true);
    std::fs::create_dir(tmp.path().join("Beta")).unwrap();
    app.tree.select_row(Some(2));
    press(&mut app, KeyCode::Char('d'));
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.view, View::Download);
    let error = app.download.as_ref().and_then(|dialog| dialog.error.clone());
    assert!(error.unwrap().contains("already exists"));
    assert!(daemon.called(proc::DOWNLOAD).is_none());
}

#[test]
fn download_without_account_explains_how_to_add_one() {
    let Fixture { mut app, .. } = fixture(false);
    app.perform(ActionRequest::Download(server_repo("b", "Beta")));
    assert_eq!(app.view, View::Message);
    assert!(app.message.contains("account add"));
}

#[test]
fn focus_lost_disables_actions_until_regained() {
    let Fixture {
        mut app, opened, ..
    } = fixture(true);
    app.tree.select_row(Some(1));
    app.tree.hide();
    press(&mut app, KeyCode::Char('o'));
    assert!(opened.borrow().is_empty());
    assert!(app.status.contains("not available"));

    app.tree.show();
    press(&mut app, KeyCode::Char('o'));
    assert_eq!(opened.borrow().len(), 1);
}

#[test]
fn click_below_last_row_clears_selection() {
    let Fixture { mut app, .. } = fixture(true);
    place_tree(&mut app);
    app.tree.select_row(Some(1));
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 8));
    assert_eq!(app.tree.selected_row(), None);
    assert!(!app.tree.actions().is_enabled(ActionKind::ShowDetails));
}

#[test]
fn click_on_category_toggles_it() {
    let Fixture { mut app, .. } = fixture(true);
    place_tree(&mut app);
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 1));
    assert_eq!(app.tree.model().row_count(), 1);
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 1));
    assert_eq!(app.tree.model().row_count(), 3);
}

#[test]
fn right_click_menu_runs_first_entry() {
    let Fixture { mut app, .. } = fixture(true);
    place_tree(&mut app);
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 5, 3));
    let menu = app.tree.context_menu().expect("menu open");
    assert_eq!(menu.entries[0], ActionKind::Download);
    assert_eq!(app.tree.selected_row(), Some(2));

    press(&mut app, KeyCode::Enter);
    assert!(app.tree.context_menu().is_none());
    assert_eq!(app.view, View::Download);
}

#[test]
fn context_menu_opens_at_the_clicked_column() {
    let Fixture { mut app, .. } = fixture(true);
    place_tree(&mut app);
    let bounds = Rect::new(0, 0, 100, 30);

    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 30, 3));
    let menu = app.tree.context_menu().expect("menu open").clone();
    assert_eq!(menu.column, Some(30));
    let popup = app.context_menu_rect(bounds, &menu);
    assert_eq!((popup.x, popup.y), (30, 3));

    // Near the right edge the popup shifts left to stay on screen.
    app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Right), 58, 3));
    let menu = app.tree.context_menu().expect("menu open").clone();
    let popup = app.context_menu_rect(Rect::new(0, 0, 60, 30), &menu);
    assert_eq!(popup.x, 60 - popup.width);

    app.tree.close_context_menu();
    press(&mut app, KeyCode::Char('m'));
    let menu = app.tree.context_menu().expect("menu open").clone();
    assert_eq!(menu.column, None);
    assert_eq!(app.context_menu_rect(bounds, &menu).x, 4);
}

#[test]
fn hovering_a_repo_shows_its_tooltip() {
    let Fixture { mut app, .. } = fixture(true);
    place_tree(&mut app);
    app.handle_mouse(mouse(MouseEventKind::Moved, 5, 2));
    let tooltip = app.tree.tooltip().expect("tooltip");
    assert_eq!(tooltip.lines[0], "Alpha");
    app.handle_mouse(mouse(MouseEventKind::Moved, 5, 11));
    assert!(app.tree.tooltip().is_none());
}

#[test]
fn auto_sync_toggle_is_saved() {
    let Fixture {
        mut app,
        daemon,
        tmp,
        ..
    } = fixture(true);
    press(&mut app, KeyCode::Char('a'));
    assert!(daemon.called(proc::DISABLE_AUTO_SYNC).is_some());
    assert!(!app.client.settings().auto_sync);

    let saved = AppConfig::load(&tmp.path().join("config.json")).unwrap();
    assert!(!saved.settings.auto_sync);

    app.refresh_local();
    let alpha = app.tree.model().repo(TreeIndex::Repo(0, 0)).unwrap();
    assert_eq!(
        alpha.local_repo().unwrap().sync_info.state,
        "auto sync is turned off"
    );
}

#[test]
fn failed_auto_sync_toggle_keeps_settings() {
    let Fixture {
        mut app, daemon, ..
    } = fixture(true);
    daemon.reply(proc::DISABLE_AUTO_SYNC, json!(-1));
    press(&mut app, KeyCode::Char('a'));
    assert!(app.client.settings().auto_sync);
    assert!(app.status.starts_with("Failed to toggle auto sync"));
}

#[test]
fn clone_task_cancel_failure_is_shown() {
    let Fixture {
        mut app, daemon, ..
    } = fixture(true);
    daemon.reply(
        proc::GET_CLONE_TASKS,
        json!([{"repo_id": "c", "repo_name": "Gamma", "worktree": "/home/me/Gamma", "state": "fetch"}]),
    );
    daemon.fail(proc::CANCEL_CLONE_TASK, 1, "");
    press(&mut app, KeyCode::Char('c'));
    assert_eq!(app.view, View::CloneTasks);
    assert_eq!(app.clone_tasks.tasks.len(), 1);

    press(&mut app, KeyCode::Char('x'));
    assert_eq!(
        daemon.called(proc::CANCEL_CLONE_TASK),
        Some(vec![RpcArg::str("c")])
    );
    let error = app.clone_tasks.error.clone().unwrap();
    assert!(error.starts_with("Failed to cancel this task"));
    assert!(error.contains("Unknown error"));
}

#[test]
fn clone_task_remove_failure_survives_refresh_and_success_clears_it() {
    let Fixture {
        mut app, daemon, ..
    } = fixture(true);
    daemon.reply(
        proc::GET_CLONE_TASKS,
        json!([{"repo_id": "c", "repo_name": "Gamma", "worktree": "/home/me/Gamma", "state": "error", "error_str": "index"}]),
    );
    daemon.fail(proc::REMOVE_CLONE_TASK, 1, "Task not found");
    press(&mut app, KeyCode::Char('c'));

    press(&mut app, KeyCode::Delete);
    assert_eq!(
        app.clone_tasks.error.as_deref(),
        Some("Failed to remove this task: Task not found")
    );

    daemon.reply(proc::REMOVE_CLONE_TASK, json!(0));
    press(&mut app, KeyCode::Delete);
    assert_eq!(app.clone_tasks.error, None);
}

#[test]
fn details_view_lists_repo_facts() {
    let Fixture { mut app, .. } = fixture(true);
    app.tree.select_row(Some(1));
    press(&mut app, KeyCode::Char('i'));
    assert_eq!(app.view, View::Details);
    assert!(app.details.contains(&"Name: Alpha".to_string()));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.view, View::Tree);
}

#[test]
fn q_quits_from_tree() {
    let Fixture { mut app, .. } = fixture(true);
    assert!(!press(&mut app, KeyCode::Down));
    assert!(press(&mut app, KeyCode::Char('q')));
}

#[test]
fn draw_records_tree_area_for_mouse_hits() {
    let Fixture { mut app, .. } = fixture(true);
    let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    assert!(app.tree_area.height > 2);
    let first_row = app.tree_area.y + 1;
    assert_eq!(app.row_at(app.tree_area.x + 2, first_row), Some(0));
    assert_eq!(app.row_at(0, 0), None);
}

#[test]
fn disconnected_client_still_draws() {
    let tmp = TempDir::new().unwrap();
    let mut app = TuiApp::new(TuiContext {
        client: RpcClient::disconnected(Settings::default()),
        server: None,
        account: None,
        opener: Box::new(RecordingOpener::default()),
        config: AppConfig::default(),
        config_path: tmp.path().join("config.json"),
        download_dir: tmp.path().to_path_buf(),
        log_buffer: LogBuffer::new(10),
    });
    app.refresh_all();
    assert_eq!(app.tree.model().row_count(), 0);
    let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
    terminal.draw(|frame| app.draw(frame)).unwrap();
    assert!(app.header_text().contains("Daemon: offline"));
}
