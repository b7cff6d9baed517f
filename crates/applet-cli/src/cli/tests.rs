use super::*;
use applet_core::bag::PropertyBag;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn no_subcommand_means_tui() {
    let cli = Cli::try_parse_from(["applet"]).unwrap();
    assert!(cli.command.is_none());
    assert_eq!(command_label(cli.command.as_ref()), "tui");
}

#[test]
fn global_options_work_after_subcommand() {
    let cli = Cli::try_parse_from([
        "applet",
        "repos",
        "list",
        "--daemon-dir",
        "/tmp/daemon",
        "--config",
        "/tmp/applet.json",
    ])
    .unwrap();
    assert_eq!(cli.daemon_dir, Some(PathBuf::from("/tmp/daemon")));
    assert_eq!(cli.config, Some(PathBuf::from("/tmp/applet.json")));
    assert!(matches!(
        cli.command,
        Some(Commands::Repos(ReposArgs {
            command: ReposCommands::List
        }))
    ));
}

#[test]
fn config_set_parses_service_and_int_flag() {
    let cli = Cli::try_parse_from([
        "applet", "config", "set", "--service", "peer", "--int", "port", "10001",
    ])
    .unwrap();
    let Some(Commands::Config(ConfigArgs {
        command: ConfigCommands::Set(args),
    })) = cli.command
    else {
        panic!("expected config set");
    };
    assert_eq!(args.service, ServiceValue::Peer);
    assert!(args.int);
    assert_eq!(args.key, "port");
    assert_eq!(args.value, "10001");
    assert_eq!(Service::from(args.service), Service::Peer);
}

#[test]
fn config_get_defaults_to_sync_service() {
    let cli = Cli::try_parse_from(["applet", "config", "get", "client_name"]).unwrap();
    let Some(Commands::Config(ConfigArgs {
        command: ConfigCommands::Get(args),
    })) = cli.command
    else {
        panic!("expected config get");
    };
    assert_eq!(args.service, ServiceValue::Sync);
    assert!(!args.int);
}

#[test]
fn auto_sync_requires_on_or_off() {
    let cli = Cli::try_parse_from(["applet", "auto-sync", "off"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::AutoSync(AutoSyncArgs { state: Toggle::Off }))
    ));
    assert!(Cli::try_parse_from(["applet", "auto-sync", "maybe"]).is_err());
}

#[test]
fn download_requires_parent_dir() {
    assert!(Cli::try_parse_from(["applet", "download", "r1"]).is_err());
    let cli = Cli::try_parse_from([
        "applet",
        "download",
        "r1",
        "--parent-dir",
        "/data",
        "--password",
        "pw",
    ])
    .unwrap();
    let Some(Commands::Download(args)) = cli.command else {
        panic!("expected download");
    };
    assert_eq!(args.repo_id, "r1");
    assert_eq!(args.parent_dir, PathBuf::from("/data"));
    assert_eq!(args.password.as_deref(), Some("pw"));
}

#[test]
fn clone_task_commands_take_repo_id() {
    let cli = Cli::try_parse_from(["applet", "clone-tasks", "cancel", "r9"]).unwrap();
    let Some(Commands::CloneTasks(CloneTasksArgs {
        command: CloneTasksCommands::Cancel(args),
    })) = cli.command
    else {
        panic!("expected clone-tasks cancel");
    };
    assert_eq!(args.repo_id, "r9");
    assert!(Cli::try_parse_from(["applet", "clone-tasks", "remove"]).is_err());
}

#[test]
fn daemon_dir_flag_beats_config() {
    let config = AppConfig {
        daemon_dir: Some(PathBuf::from("/from/config")),
        ..AppConfig::default()
    };
    assert_eq!(
        resolve_daemon_dir(Some(PathBuf::from("/from/flag")), &config).unwrap(),
        PathBuf::from("/from/flag")
    );
    assert_eq!(
        resolve_daemon_dir(None, &config).unwrap(),
        PathBuf::from("/from/config")
    );
}

#[test]
fn account_add_saves_and_replaces() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("config.json");
    let add = |token: &str| AccountArgs {
        command: AccountCommands::Add(AccountAddArgs {
            server: "https://cloud.example.com".to_string(),
            username: "me@example.com".to_string(),
            token: token.to_string(),
        }),
    };
    handle_account(add("one"), &path).unwrap();
    handle_account(add("two"), &path).unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.accounts.len(), 1);
    assert_eq!(config.current_account().unwrap().token, "two");
}

#[test]
fn account_add_rejects_empty_token() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("config.json");
    let args = AccountArgs {
        command: AccountCommands::Add(AccountAddArgs {
            server: "https://cloud.example.com".to_string(),
            username: "me@example.com".to_string(),
            token: "  ".to_string(),
        }),
    };
    assert!(handle_account(args, &path).is_err());
    assert!(!path.exists());
}

#[test]
fn repo_and_task_lines_are_tab_separated() {
    let mut repo = LocalRepo {
        id: "r1".to_string(),
        name: "Docs".to_string(),
        worktree: PathBuf::from("/home/me/Docs"),
        ..LocalRepo::default()
    };
    repo.set_sync_info("error", Some("disk full".to_string()));
    assert_eq!(
        local_repo_line(&repo),
        "r1\tDocs\t/home/me/Docs\terror (disk full)"
    );

    let bag = PropertyBag::from_value(json!({
        "repo_id": "r2",
        "repo_name": "Photos",
        "worktree": "/home/me/Photos",
        "state": "done"
    }))
    .unwrap();
    let task = CloneTask::from_bag(&bag);
    let line = clone_task_line(&task);
    assert!(line.starts_with("r2\tPhotos\t/home/me/Photos\t"));
}
