//! Headless view-model behind the repo tree panel.
//!
//! The terminal layer only maps keys, mouse rows and focus changes onto
//! [`RepoTreeView`]; everything that decides what is shown or enabled lives
//! here so it can be exercised without a terminal.

use applet_core::clone_task::CloneTask;
use applet_core::model::{LocalRepo, RepoCategory, ServerRepo};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
pub enum LocalState {
    Remote,
    Cloning(CloneTask),
    Synced(LocalRepo),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RepoItem {
    pub repo: ServerRepo,
    pub local: LocalState,
}

impl RepoItem {
    pub fn local_repo(&self) -> Option<&LocalRepo> {
        match &self.local {
            LocalState::Synced(local) => Some(local),
            _ => None,
        }
    }

    pub fn clone_task(&self) -> Option<&CloneTask> {
        match &self.local {
            LocalState::Cloning(task) => Some(task),
            _ => None,
        }
    }

    pub fn has_local_copy(&self) -> bool {
        self.local_repo().is_some()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryItem {
    pub category: RepoCategory,
    pub expanded: bool,
    pub repos: Vec<RepoItem>,
}

impl CategoryItem {
    pub fn name(&self) -> String {
        self.category.label()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TreeIndex {
    Category(usize),
    Repo(usize, usize),
}

#[derive(Clone, Copy, Debug)]
pub enum TreeItem<'a> {
    Repo(&'a RepoItem),
    Category(&'a CategoryItem),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RepoTreeModel {
    categories: Vec<CategoryItem>,
}

impl RepoTreeModel {
    /// Merges the server listing with what the daemon reports locally.
    ///
    /// One item per repo id. A synced local repo hides a clone task for the
    /// same id. Local repos and clone tasks the server did not list are filed
    /// under "My Libraries".
    pub fn build(server: Vec<ServerRepo>, local: Vec<LocalRepo>, tasks: Vec<CloneTask>) -> Self {
        let mut local: HashMap<String, LocalRepo> = local
            .into_iter()
            .filter(LocalRepo::is_valid)
            .map(|repo| (repo.id.clone(), repo))
            .collect();
        let mut tasks: HashMap<String, CloneTask> = tasks
            .into_iter()
            .filter(|task| !task.repo_id.is_empty())
            .map(|task| (task.repo_id.clone(), task))
            .collect();

        let mut items = Vec::new();
        for repo in server {
            let state = match (local.remove(&repo.id), tasks.remove(&repo.id)) {
                (Some(synced), _) => LocalState::Synced(synced),
                (None, Some(task)) => LocalState::Cloning(task),
                (None, None) => LocalState::Remote,
            };
            items.push(RepoItem { repo, local: state });
        }
        for (id, synced) in local {
            tasks.remove(&id);
            items.push(RepoItem {
                repo: ServerRepo {
                    id,
                    name: synced.name.clone(),
                    description: synced.description.clone(),
                    owner: String::new(),
                    encrypted: synced.encrypted,
                    size: 0,
                    mtime: u64::try_from(synced.last_modified).unwrap_or(0),
                    category: RepoCategory::Mine,
                },
                local: LocalState::Synced(synced),
            });
        }
        for (id, task) in tasks {
            items.push(RepoItem {
                repo: ServerRepo {
                    id,
                    name: task.repo_name.clone(),
                    description: String::new(),
                    owner: String::new(),
                    encrypted: false,
                    size: 0,
                    mtime: 0,
                    category: RepoCategory::Mine,
                },
                local: LocalState::Cloning(task),
            });
        }

        let mut grouped: Vec<CategoryItem> = Vec::new();
        items.sort_by(|a, b| {
            a.repo
                .category
                .cmp(&b.repo.category)
                .then_with(|| a.repo.name.to_lowercase().cmp(&b.repo.name.to_lowercase()))
                .then_with(|| a.repo.id.cmp(&b.repo.id))
        });
        for item in items {
            match grouped.last_mut() {
                Some(category) if category.category == item.repo.category => {
                    category.repos.push(item)
                }
                _ => grouped.push(CategoryItem {
                    category: item.repo.category.clone(),
                    expanded: true,
                    repos: vec![item],
                }),
            }
        }
        Self {
            categories: grouped,
        }
    }

    pub fn categories(&self) -> &[CategoryItem] {
        &self.categories
    }

    pub fn rows(&self) -> Vec<TreeIndex> {
        let mut rows = Vec::new();
        for (ci, category) in self.categories.iter().enumerate() {
            rows.push(TreeIndex::Category(ci));
            if category.expanded {
                rows.extend((0..category.repos.len()).map(|ri| TreeIndex::Repo(ci, ri)));
            }
        }
        rows
    }

    pub fn row_count(&self) -> usize {
        self.rows().len()
    }

    pub fn index_at(&self, row: usize) -> Option<TreeIndex> {
        self.rows().get(row).copied()
    }

    pub fn row_of(&self, index: TreeIndex) -> Option<usize> {
        self.rows().iter().position(|candidate| *candidate == index)
    }

    pub fn item(&self, index: TreeIndex) -> Option<TreeItem<'_>> {
        match index {
            TreeIndex::Category(ci) => self.categories.get(ci).map(TreeItem::Category),
            TreeIndex::Repo(ci, ri) => self
                .categories
                .get(ci)
                .filter(|category| category.expanded)
                .and_then(|category| category.repos.get(ri))
                .map(TreeItem::Repo),
        }
    }

    pub fn repo(&self, index: TreeIndex) -> Option<&RepoItem> {
        match self.item(index)? {
            TreeItem::Repo(repo) => Some(repo),
            TreeItem::Category(_) => None,
        }
    }

    pub fn find_repo(&self, repo_id: &str) -> Option<TreeIndex> {
        self.categories.iter().enumerate().find_map(|(ci, category)| {
            category
                .repos
                .iter()
                .position(|item| item.repo.id == repo_id)
                .map(|ri| TreeIndex::Repo(ci, ri))
        })
    }

    fn find_category(&self, category: &RepoCategory) -> Option<usize> {
        self.categories
            .iter()
            .position(|candidate| &candidate.category == category)
    }

    pub fn toggle_expanded(&mut self, ci: usize) {
        if let Some(category) = self.categories.get_mut(ci) {
            category.expanded = !category.expanded;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Download,
    OpenLocalFolder,
    ViewOnWeb,
    ShowDetails,
}

impl ActionKind {
    pub fn key_hint(self) -> char {
        match self {
            ActionKind::Download => 'd',
            ActionKind::OpenLocalFolder => 'o',
            ActionKind::ViewOnWeb => 'w',
            ActionKind::ShowDetails => 'i',
        }
    }
}

/// A user action whose payload is attached ahead of time, like a menu entry
/// carrying the item it applies to.
#[derive(Clone, Debug)]
pub struct Action<T> {
    pub label: &'static str,
    pub status_tip: &'static str,
    pub enabled: bool,
    data: Option<T>,
}

impl<T: Clone> Action<T> {
    fn new(label: &'static str, status_tip: &'static str) -> Self {
        Self {
            label,
            status_tip,
            enabled: false,
            data: None,
        }
    }

    fn attach(&mut self, data: Option<T>) {
        self.enabled = data.is_some();
        self.data = data;
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    fn fire(&self) -> Option<T> {
        if self.enabled {
            self.data.clone()
        } else {
            None
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ActionRequest {
    Download(ServerRepo),
    OpenLocalFolder(LocalRepo),
    ViewOnWeb(String),
    ShowDetails(RepoItem),
}

#[derive(Clone, Debug)]
pub struct RepoActions {
    pub download: Action<ServerRepo>,
    pub open_local_folder: Action<LocalRepo>,
    pub view_on_web: Action<String>,
    pub show_details: Action<RepoItem>,
}

impl Default for RepoActions {
    fn default() -> Self {
        Self {
            download: Action::new("Download this library", "Download this library"),
            open_local_folder: Action::new(
                "Open local folder",
                "Open local folder of this library",
            ),
            view_on_web: Action::new("View on website", "View this library on the website"),
            show_details: Action::new("Show details", "Show details of this library"),
        }
    }
}

impl RepoActions {
    pub fn update(&mut self, item: Option<&RepoItem>) {
        let Some(item) = item else {
            self.download.attach(None);
            self.open_local_folder.attach(None);
            self.view_on_web.attach(None);
            self.show_details.attach(None);
            return;
        };
        match item.local_repo() {
            Some(local) => {
                self.open_local_folder.attach(Some(local.clone()));
                self.download.attach(None);
            }
            None => {
                self.open_local_folder.attach(None);
                self.download.attach(Some(item.repo.clone()));
            }
        }
        self.view_on_web.attach(Some(item.repo.id.clone()));
        self.show_details.attach(Some(item.clone()));
    }

    pub fn is_enabled(&self, kind: ActionKind) -> bool {
        match kind {
            ActionKind::Download => self.download.enabled,
            ActionKind::OpenLocalFolder => self.open_local_folder.enabled,
            ActionKind::ViewOnWeb => self.view_on_web.enabled,
            ActionKind::ShowDetails => self.show_details.enabled,
        }
    }

    pub fn label(&self, kind: ActionKind) -> &'static str {
        match kind {
            ActionKind::Download => self.download.label,
            ActionKind::OpenLocalFolder => self.open_local_folder.label,
            ActionKind::ViewOnWeb => self.view_on_web.label,
            ActionKind::ShowDetails => self.show_details.label,
        }
    }

    pub fn status_tip(&self, kind: ActionKind) -> &'static str {
        match kind {
            ActionKind::Download => self.download.status_tip,
            ActionKind::OpenLocalFolder => self.open_local_folder.status_tip,
            ActionKind::ViewOnWeb => self.view_on_web.status_tip,
            ActionKind::ShowDetails => self.show_details.status_tip,
        }
    }

    pub fn trigger(&self, kind: ActionKind) -> Option<ActionRequest> {
        match kind {
            ActionKind::Download => self.download.fire().map(ActionRequest::Download),
            ActionKind::OpenLocalFolder => self
                .open_local_folder
                .fire()
                .map(ActionRequest::OpenLocalFolder),
            ActionKind::ViewOnWeb => self.view_on_web.fire().map(ActionRequest::ViewOnWeb),
            ActionKind::ShowDetails => self.show_details.fire().map(ActionRequest::ShowDetails),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContextMenu {
    pub row: usize,
    /// Terminal column the menu was requested at; `None` when opened from the keyboard.
    pub column: Option<u16>,
    pub entries: Vec<ActionKind>,
    pub selected: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tooltip {
    pub row: usize,
    pub lines: Vec<String>,
}

/// Renders repo rows and their tooltips.
pub trait ItemDelegate {
    fn row_text(&self, item: &RepoItem) -> String;
    fn tooltip(&self, item: &RepoItem) -> Vec<String>;
}

pub struct DefaultItemDelegate;

impl DefaultItemDelegate {
    fn status(item: &RepoItem) -> String {
        match &item.local {
            LocalState::Remote => "not downloaded".to_string(),
            LocalState::Cloning(task) => task.display_state(),
            LocalState::Synced(local) => local.sync_info.label(),
        }
    }
}

impl ItemDelegate for DefaultItemDelegate {
    fn row_text(&self, item: &RepoItem) -> String {
        let marker = match &item.local {
            LocalState::Remote => ' ',
            LocalState::Cloning(_) => '~',
            LocalState::Synced(_) => '*',
        };
        let lock = if item.repo.encrypted { " [encrypted]" } else { "" };
        format!("{marker} {}{lock}  ({})", item.repo.name, Self::status(item))
    }

    fn tooltip(&self, item: &RepoItem) -> Vec<String> {
        let mut lines = vec![item.repo.name.clone()];
        if !item.repo.description.is_empty() {
            lines.push(item.repo.description.clone());
        }
        lines.push(format!("Status: {}", Self::status(item)));
        if let Some(local) = item.local_repo() {
            lines.push(format!("Local folder: {}", local.worktree.display()));
        }
        if let Some(task) = item.clone_task()
            && let Some(pct) = task.progress_percent()
        {
            lines.push(format!("Progress: {pct}%"));
        }
        lines
    }
}

pub struct RepoTreeView {
    model: RepoTreeModel,
    selected: Option<TreeIndex>,
    actions: RepoActions,
    visible: bool,
    context_menu: Option<ContextMenu>,
    tooltip: Option<Tooltip>,
    delegate: Box<dyn ItemDelegate>,
}

impl Default for RepoTreeView {
    fn default() -> Self {
        Self::new(Box::new(DefaultItemDelegate))
    }
}

impl RepoTreeView {
    pub fn new(delegate: Box<dyn ItemDelegate>) -> Self {
        Self {
            model: RepoTreeModel::default(),
            selected: None,
            actions: RepoActions::default(),
            visible: true,
            context_menu: None,
            tooltip: None,
            delegate,
        }
    }

    pub fn model(&self) -> &RepoTreeModel {
        &self.model
    }

    pub fn actions(&self) -> &RepoActions {
        &self.actions
    }

    pub fn delegate(&self) -> &dyn ItemDelegate {
        self.delegate.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.selected.and_then(|index| self.model.row_of(index))
    }

    pub fn selected_repo(&self) -> Option<&RepoItem> {
        self.selected.and_then(|index| self.model.repo(index))
    }

    /// Swaps in a fresh model, keeping expanded state and the selection by
    /// repo id or category.
    pub fn set_model(&mut self, mut model: RepoTreeModel) {
        for category in &mut model.categories {
            if let Some(previous) = self
                .model
                .find_category(&category.category)
                .and_then(|ci| self.model.categories.get(ci))
            {
                category.expanded = previous.expanded;
            }
        }
        let selected = match self.selected.and_then(|index| self.model.item(index)) {
            Some(TreeItem::Repo(item)) => model.find_repo(&item.repo.id),
            Some(TreeItem::Category(category)) => model
                .find_category(&category.category)
                .map(TreeIndex::Category),
            None => None,
        };
        let selected = selected.filter(|index| model.item(*index).is_some());
        self.model = model;
        self.tooltip = None;
        if self
            .context_menu
            .as_ref()
            .is_some_and(|menu| self.model.repo_at(menu.row).is_none())
        {
            self.context_menu = None;
        }
        self.selection_changed(selected);
    }

    pub fn selection_changed(&mut self, index: Option<TreeIndex>) {
        self.selected = index.filter(|index| self.model.item(*index).is_some());
        if self.visible {
            let repo = self.selected.and_then(|index| self.model.repo(index));
            self.actions.update(repo);
        }
    }

    pub fn select_row(&mut self, row: Option<usize>) {
        let index = row.and_then(|row| self.model.index_at(row));
        self.selection_changed(index);
    }

    pub fn move_selection(&mut self, delta: isize) {
        let count = self.model.row_count();
        if count == 0 {
            self.selection_changed(None);
            return;
        }
        let row = match self.selected_row() {
            Some(row) => row.saturating_add_signed(delta).min(count - 1),
            None => 0,
        };
        self.select_row(Some(row));
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.context_menu = None;
        self.tooltip = None;
        self.actions.update(None);
    }

    pub fn show(&mut self) {
        self.visible = true;
        let repo = self.selected.and_then(|index| self.model.repo(index));
        self.actions.update(repo);
    }

    /// Opens the context menu for a repo row. Selects the row first so the
    /// menu entries carry its data.
    pub fn open_context_menu(&mut self, row: usize, column: Option<u16>) -> Option<&ContextMenu> {
        self.tooltip = None;
        let Some(item) = self.model.repo_at(row) else {
            self.context_menu = None;
            return None;
        };
        let first = if item.has_local_copy() {
            ActionKind::OpenLocalFolder
        } else {
            ActionKind::Download
        };
        self.select_row(Some(row));
        self.context_menu = Some(ContextMenu {
            row,
            column,
            entries: vec![first, ActionKind::ViewOnWeb, ActionKind::ShowDetails],
            selected: 0,
        });
        self.context_menu.as_ref()
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn move_menu_selection(&mut self, delta: isize) {
        if let Some(menu) = self.context_menu.as_mut()
            && !menu.entries.is_empty()
        {
            let last = menu.entries.len() - 1;
            menu.selected = menu.selected.saturating_add_signed(delta).min(last);
        }
    }

    pub fn activate_menu_entry(&mut self) -> Option<ActionRequest> {
        let menu = self.context_menu.take()?;
        let kind = menu.entries.get(menu.selected).copied()?;
        self.actions.trigger(kind)
    }

    /// Category rows toggle; repo rows are left to selection handling.
    pub fn click(&mut self, row: usize) {
        let Some(index) = self.model.index_at(row) else {
            return;
        };
        match index {
            TreeIndex::Category(ci) => {
                self.model.toggle_expanded(ci);
                if let Some(TreeIndex::Repo(selected_ci, _)) = self.selected
                    && selected_ci == ci
                {
                    self.selection_changed(Some(TreeIndex::Category(ci)));
                }
            }
            TreeIndex::Repo(..) => {}
        }
    }

    pub fn show_tooltip(&mut self, row: usize) -> Option<&Tooltip> {
        let lines = match self.model.index_at(row).and_then(|index| self.model.item(index)) {
            Some(TreeItem::Repo(item)) => self.delegate.tooltip(item),
            Some(TreeItem::Category(category)) => vec![category.name()],
            None => {
                self.tooltip = None;
                return None;
            }
        };
        self.tooltip = Some(Tooltip { row, lines });
        self.tooltip.as_ref()
    }

    pub fn hide_tooltip(&mut self) {
        self.tooltip = None;
    }

    pub fn toolbar_actions(&self) -> [ActionKind; 4] {
        [
            ActionKind::Download,
            ActionKind::OpenLocalFolder,
            ActionKind::ShowDetails,
            ActionKind::ViewOnWeb,
        ]
    }

    pub fn trigger(&self, kind: ActionKind) -> Option<ActionRequest> {
        self.actions.trigger(kind)
    }
}

impl RepoTreeModel {
    fn repo_at(&self, row: usize) -> Option<&RepoItem> {
        self.index_at(row).and_then(|index| self.repo(index))
    }
}
