use super::*;

pub(super) fn resolve_daemon_dir(
    override_dir: Option<PathBuf>,
    config: &AppConfig,
) -> anyhow::Result<PathBuf> {
    match override_dir {
        Some(dir) => Ok(dir),
        None => config.daemon_dir(),
    }
}

/// Connects to the daemon. An unusable daemon config dir ends the process;
/// a daemon that is simply not running yields a disconnected client.
pub(super) fn connect_client(daemon_dir: &Path, config: &AppConfig) -> RpcClient {
    match RpcClient::connect(daemon_dir, config.settings.clone()) {
        Ok(client) => {
            if !client.is_connected() {
                warn!(daemon_dir = %daemon_dir.display(), "Sync daemon is not running");
            }
            client
        }
        Err(err) => {
            error!(error = %err, "Daemon config unusable");
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

pub(super) fn local_repo_line(repo: &LocalRepo) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        repo.id,
        repo.name,
        repo.worktree.display(),
        repo.sync_info.label()
    )
}

pub(super) fn clone_task_line(task: &CloneTask) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        task.repo_id,
        task.repo_name,
        task.worktree.display(),
        task.display_state()
    )
}
