use super::*;
pub(super) fn handle_repos(args: ReposArgs, client: &mut RpcClient) -> anyhow::Result<()> {
    match args.command {
        ReposCommands::List => {
            let mut repos = client.list_local_repos().context("list local repos")?;
            if repos.is_empty() {
                println!("No local repos.");
                return Ok(());
            }
            for repo in &mut repos {
                client.get_sync_status(repo);
                println!("{}", local_repo_line(repo));
            }
            Ok(())
        }
        ReposCommands::Show(args) => {
            let repo = client
                .get_local_repo(&args.repo_id)
                .with_context(|| format!("look up repo {}", args.repo_id))?;
            println!("ID: {}", repo.id);
            println!("Name: {}", repo.name);
            if !repo.description.is_empty() {
                println!("Description: {}", repo.description);
            }
            println!("Folder: {}", repo.worktree.display());
            println!("Auto sync: {}", if repo.auto_sync { "on" } else { "off" });
            println!("Encrypted: {}", if repo.encrypted { "yes" } else { "no" });
            println!("Sync status: {}", repo.sync_info.label());
            Ok(())
        }
        ReposCommands::Has(args) => {
            println!("{}", client.has_local_repo(&args.repo_id));
            Ok(())
        }
    }
}

pub(super) fn handle_auto_sync(
    args: AutoSyncArgs,
    client: &mut RpcClient,
    mut config: AppConfig,
    config_path: &Path,
) -> anyhow::Result<()> {
    let enabled = args.state == Toggle::On;
    client
        .set_auto_sync(enabled)
        .context("failed to toggle auto sync")?;
    config.settings = client.settings().clone();
    config.save(config_path)?;
    println!("Auto sync {}", if enabled { "enabled" } else { "disabled" });
    Ok(())
}

pub(super) fn handle_download(
    args: DownloadArgs,
    client: &mut RpcClient,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let Some(account) = config.current_account() else {
        bail!("no account configured; run `applet account add` first");
    };
    if !args.parent_dir.is_dir() {
        bail!("{} is not a folder", args.parent_dir.display());
    }
    let api = ServerApi::new(account.clone())?;
    let info = api
        .download_info(&args.repo_id)
        .with_context(|| format!("fetch download info for {}", args.repo_id))?;
    if info.encrypted && args.password.as_deref().is_none_or(str::is_empty) {
        bail!("repo {} is encrypted; pass --password", args.repo_id);
    }
    let name = if info.repo_name.is_empty() {
        args.repo_id.clone()
    } else {
        info.repo_name.clone()
    };
    let worktree = args.parent_dir.join(tui::folder_name(&name));
    if worktree.exists() {
        bail!("{} already exists", worktree.display());
    }
    let request = info.into_request(&worktree, args.password);
    client
        .download_repo(&request)
        .with_context(|| format!("download repo {}", args.repo_id))?;
    info!(repo_id = %args.repo_id, worktree = %worktree.display(), "Download queued");
    println!("Downloading {} into {}", name, worktree.display());
    Ok(())
}
