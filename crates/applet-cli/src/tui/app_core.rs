use super::*;

impl TuiApp {
    pub(super) fn new(context: TuiContext) -> Self {
        Self {
            client: context.client,
            server: context.server,
            account: context.account,
            opener: context.opener,
            config: context.config,
            config_path: context.config_path,
            download_dir: context.download_dir,
            log_buffer: context.log_buffer,
            tree: RepoTreeView::default(),
            view: View::Tree,
            server_repos: Vec::new(),
            status: String::new(),
            message: String::new(),
            download: None,
            clone_tasks: CloneTasksDialog::default(),
            details: Vec::new(),
            tree_area: Rect::default(),
            tree_scroll: 0,
            last_refresh: Instant::now(),
        }
    }

    fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.client.settings().refresh_interval_secs.max(1))
    }

    pub(super) fn tick(&mut self) {
        if self.last_refresh.elapsed() >= self.refresh_interval() {
            self.refresh_local();
        }
    }

    pub(super) fn refresh_all(&mut self) {
        self.refresh_server();
        self.refresh_local();
    }

    pub(super) fn refresh_server(&mut self) {
        let Some(server) = self.server.as_ref() else {
            debug!("no account configured; skipping server listing");
            return;
        };
        match server.list_repos() {
            Ok(repos) => {
                info!(count = repos.len(), "Loaded server repos");
                self.server_repos = repos;
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "Server repo listing failed");
                self.status = format!("Server listing failed: {err}");
            }
        }
    }

    /// Re-reads local repos and clone tasks from the daemon and rebuilds the
    /// tree.
    pub(super) fn refresh_local(&mut self) {
        self.last_refresh = Instant::now();
        let mut local = match self.client.list_local_repos() {
            Ok(local) => local,
            Err(err) => {
                debug!(error = %err, "local repo listing failed");
                self.status = err.to_string();
                Vec::new()
            }
        };
        for repo in &mut local {
            self.client.get_sync_status(repo);
        }
        let tasks = match self.client.get_clone_tasks() {
            Ok(tasks) => {
                self.clone_tasks.error = None;
                tasks
            }
            Err(err) => {
                debug!(error = %err, "clone task listing failed");
                self.clone_tasks.error = Some(err.to_string());
                Vec::new()
            }
        };
        self.clone_tasks.set_tasks(tasks.clone());
        self.tree
            .set_model(RepoTreeModel::build(self.server_repos.clone(), local, tasks));
    }

    pub(super) fn trigger(&mut self, kind: ActionKind) {
        match self.tree.trigger(kind) {
            Some(request) => self.perform(request),
            None => self.status = format!("{} is not available here", self.tree.actions().label(kind)),
        }
    }

    pub(super) fn perform(&mut self, request: ActionRequest) {
        match request {
            ActionRequest::Download(repo) => {
                if self.server.is_none() {
                    self.show_message(
                        "Downloading needs an account.\nAdd one with: applet account add --server <url> --username <email> --token <token>",
                    );
                    return;
                }
                info!(repo_id = %repo.id, "Opening download dialog");
                self.download = Some(DownloadDialog::new(repo, &self.download_dir));
                self.view = View::Download;
            }
            ActionRequest::OpenLocalFolder(local) => {
                match self.opener.open_folder(&local.worktree) {
                    Ok(()) => self.status = format!("Opened {}", local.worktree.display()),
                    Err(err) => {
                        warn!(repo_id = %local.id, error = %err, "Open folder failed");
                        self.status = err.to_string();
                    }
                }
            }
            ActionRequest::ViewOnWeb(repo_id) => {
                let Some(account) = self.account.as_ref().filter(|account| account.is_valid())
                else {
                    self.status = "No account configured".to_string();
                    return;
                };
                let url = account.repo_web_url(&repo_id);
                if let Err(err) = self.opener.open_url(&url) {
                    warn!(repo_id, error = %err, "Open web page failed");
                    self.status = err.to_string();
                }
            }
            ActionRequest::ShowDetails(item) => {
                self.details = detail_lines(&item);
                self.view = View::Details;
            }
        }
    }

    /// Asks the server for download info and hands the repo to the daemon,
    /// then switches to the clone task list.
    pub(super) fn accept_download(&mut self) {
        let Some(dialog) = self.download.as_mut() else {
            return;
        };
        let worktree = match dialog.validate() {
            Ok(worktree) => worktree,
            Err(reason) => {
                dialog.error = Some(reason);
                return;
            }
        };
        let Some(server) = self.server.as_ref() else {
            dialog.error = Some("No account configured".to_string());
            return;
        };
        let repo_id = dialog.repo.id.clone();
        let result = server
            .download_info(&repo_id)
            .map(|info| info.into_request(&worktree, dialog.password()))
            .and_then(|request| {
                self.client
                    .download_repo(&request)
                    .map_err(anyhow::Error::from)
            });
        match result {
            Ok(()) => {
                info!(repo_id, worktree = %worktree.display(), "Download started");
                self.download = None;
                self.view = View::CloneTasks;
                self.refresh_local();
            }
            Err(err) => {
                warn!(repo_id, error = %err, "Download failed");
                dialog.error = Some(err.to_string());
            }
        }
    }

    pub(super) fn toggle_auto_sync(&mut self) {
        let enabled = !self.client.settings().auto_sync;
        match self.client.set_auto_sync(enabled) {
            Ok(_) => {
                self.config.settings = self.client.settings().clone();
                if let Err(err) = self.config.save(&self.config_path) {
                    warn!(error = %err, "Saving settings failed");
                }
                self.status = format!("Auto sync {}", if enabled { "enabled" } else { "disabled" });
                self.refresh_local();
            }
            Err(err) => {
                warn!(enabled, error = %err, "Toggling auto sync failed");
                self.status = format!("Failed to toggle auto sync: {err}");
            }
        }
    }

    pub(super) fn cancel_selected_task(&mut self) {
        let Some(repo_id) = self.clone_tasks.selected_task().map(|task| task.repo_id.clone())
        else {
            return;
        };
        let result = self.client.cancel_clone_task(&repo_id);
        self.refresh_local();
        if let Err(err) = result {
            self.clone_tasks.error = Some(format!("Failed to cancel this task: {err}"));
        }
    }

    pub(super) fn remove_selected_task(&mut self) {
        let Some(repo_id) = self.clone_tasks.selected_task().map(|task| task.repo_id.clone())
        else {
            return;
        };
        let result = self.client.remove_clone_task(&repo_id);
        self.refresh_local();
        if let Err(err) = result {
            self.clone_tasks.error = Some(format!("Failed to remove this task: {err}"));
        }
    }

    pub(super) fn show_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.view = View::Message;
    }
}
