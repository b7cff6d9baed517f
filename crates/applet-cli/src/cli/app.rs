use super::*;
pub(super) fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_buffer = LogBuffer::new(200);
    let mode = match cli.command {
        None | Some(Commands::Tui) => LogMode::Tui,
        Some(_) => LogMode::Console,
    };
    logging::init(&log_buffer, mode);
    info!(command = command_label(cli.command.as_ref()), "Running command");

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command {
        None | Some(Commands::Tui) => run_tui(&config_path, cli.daemon_dir, log_buffer),
        Some(Commands::Account(args)) => handle_account(args, &config_path),
        Some(command) => {
            let config = AppConfig::load(&config_path)?;
            let daemon_dir = resolve_daemon_dir(cli.daemon_dir, &config)?;
            let mut client = connect_client(&daemon_dir, &config);
            match command {
                Commands::Repos(args) => handle_repos(args, &mut client),
                Commands::AutoSync(args) => {
                    handle_auto_sync(args, &mut client, config, &config_path)
                }
                Commands::CloneTasks(args) => handle_clone_tasks(args, &mut client),
                Commands::Config(args) => handle_config(args, &mut client),
                Commands::Download(args) => handle_download(args, &mut client, &config),
                Commands::Account(_) | Commands::Tui => Ok(()),
            }
        }
    }
}

fn run_tui(
    config_path: &Path,
    daemon_dir: Option<PathBuf>,
    log_buffer: LogBuffer,
) -> anyhow::Result<()> {
    let config = AppConfig::load(config_path)?;
    let daemon_dir = resolve_daemon_dir(daemon_dir, &config)?;
    let client = connect_client(&daemon_dir, &config);
    let account = config.current_account().cloned();
    let server = match account.clone().filter(Account::is_valid) {
        Some(account) => match ServerApi::new(account) {
            Ok(api) => Some(Box::new(api) as Box<dyn RepoSource>),
            Err(err) => {
                warn!(error = %err, "Server API unavailable");
                None
            }
        },
        None => None,
    };
    info!(mode = "tui", daemon_dir = %daemon_dir.display(), "Launching TUI");
    tui::run_tui(TuiContext {
        client,
        server,
        account,
        opener: Box::new(SystemOpener),
        config,
        config_path: config_path.to_path_buf(),
        download_dir: default_download_dir(),
        log_buffer,
    })
}
