use super::helpers::*;
use super::repo_tree::{LocalState, RepoItem};
use applet_core::clone_task::CloneTask;
use applet_core::model::ServerRepo;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub(in crate::tui) struct InputField {
    pub(in crate::tui) label: &'static str,
    pub(in crate::tui) value: String,
    pub(in crate::tui) mask: bool,
}

impl InputField {
    pub(in crate::tui) fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
            mask: false,
        }
    }

    pub(in crate::tui) fn masked(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            mask: true,
        }
    }

    pub(in crate::tui) fn display_value(&self) -> String {
        if self.mask {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// Where to put a repo, plus its password when encrypted.
#[derive(Clone, Debug)]
pub(in crate::tui) struct DownloadDialog {
    pub(in crate::tui) repo: ServerRepo,
    pub(in crate::tui) fields: Vec<InputField>,
    pub(in crate::tui) index: usize,
    pub(in crate::tui) error: Option<String>,
}

impl DownloadDialog {
    pub(in crate::tui) fn new(repo: ServerRepo, default_parent: &Path) -> Self {
        let mut fields = vec![InputField::new(
            "Parent folder",
            default_parent.display().to_string(),
        )];
        if repo.encrypted {
            fields.push(InputField::masked("Password"));
        }
        Self {
            repo,
            fields,
            index: 0,
            error: None,
        }
    }

    pub(in crate::tui) fn next_field(&mut self) {
        self.index = (self.index + 1) % self.fields.len().max(1);
    }

    pub(in crate::tui) fn push(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.index) {
            field.value.push(ch);
        }
    }

    pub(in crate::tui) fn pop(&mut self) {
        if let Some(field) = self.fields.get_mut(self.index) {
            field.value.pop();
        }
    }

    pub(in crate::tui) fn password(&self) -> Option<String> {
        self.fields
            .iter()
            .find(|field| field.mask)
            .map(|field| field.value.clone())
            .filter(|value| !value.is_empty())
    }

    /// The worktree the repo would be downloaded into, or why not.
    pub(in crate::tui) fn validate(&self) -> Result<PathBuf, String> {
        let parent = self
            .fields
            .first()
            .map(|field| field.value.trim())
            .unwrap_or("");
        if parent.is_empty() {
            return Err("Please choose a folder".to_string());
        }
        let parent = PathBuf::from(parent);
        if !parent.is_dir() {
            return Err(format!("{} is not a folder", parent.display()));
        }
        if self.repo.encrypted && self.password().is_none() {
            return Err("Please enter the password".to_string());
        }
        let worktree = parent.join(folder_name(&self.repo.name));
        if worktree.exists() {
            return Err(format!("{} already exists", worktree.display()));
        }
        Ok(worktree)
    }
}

#[derive(Clone, Debug, Default)]
pub(in crate::tui) struct CloneTasksDialog {
    pub(in crate::tui) tasks: Vec<CloneTask>,
    pub(in crate::tui) selected: usize,
    pub(in crate::tui) error: Option<String>,
}

impl CloneTasksDialog {
    pub(in crate::tui) fn set_tasks(&mut self, tasks: Vec<CloneTask>) {
        let previous = self.selected_task().map(|task| task.repo_id.clone());
        self.tasks = tasks;
        self.selected = previous
            .and_then(|id| self.tasks.iter().position(|task| task.repo_id == id))
            .unwrap_or_else(|| clamp_index(self.selected, self.tasks.len()));
    }

    pub(in crate::tui) fn selected_task(&self) -> Option<&CloneTask> {
        self.tasks.get(self.selected)
    }

    pub(in crate::tui) fn move_selection(&mut self, delta: isize) {
        self.selected = clamp_index(self.selected.saturating_add_signed(delta), self.tasks.len());
    }

    pub(in crate::tui) fn rows(&self) -> Vec<String> {
        self.tasks
            .iter()
            .map(|task| {
                let name = if task.repo_name.is_empty() {
                    task.repo_id.as_str()
                } else {
                    task.repo_name.as_str()
                };
                format!(
                    "{:<24} {:<32} {}",
                    truncate_with_ellipsis(name, 24),
                    truncate_with_ellipsis(&task.display_state(), 32),
                    task.worktree.display()
                )
            })
            .collect()
    }
}

pub(in crate::tui) fn detail_lines(item: &RepoItem) -> Vec<String> {
    let repo = &item.repo;
    let mut lines = vec![
        format!("Name: {}", repo.name),
        format!("ID: {}", repo.id),
        format!("Library: {}", repo.category),
    ];
    if !repo.owner.is_empty() {
        lines.push(format!("Owner: {}", repo.owner));
    }
    if !repo.description.is_empty() {
        lines.push(format!("Description: {}", repo.description));
    }
    lines.push(format!("Size: {}", format_size(repo.size)));
    lines.push(format!("Last modified: {}", format_epoch(repo.mtime)));
    lines.push(format!(
        "Encrypted: {}",
        if repo.encrypted { "yes" } else { "no" }
    ));
    match &item.local {
        LocalState::Remote => lines.push("Local copy: none".to_string()),
        LocalState::Cloning(task) => {
            lines.push(format!("Download: {}", task.display_state()));
            lines.push(format!("Local folder: {}", task.worktree.display()));
        }
        LocalState::Synced(local) => {
            lines.push(format!("Local folder: {}", local.worktree.display()));
            lines.push(format!(
                "Auto sync: {}",
                if local.auto_sync { "on" } else { "off" }
            ));
            lines.push(format!("Sync status: {}", local.sync_info.label()));
        }
    }
    lines
}
