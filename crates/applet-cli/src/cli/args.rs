use super::*;
#[derive(Parser)]
#[command(author, version, about)]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Directory holding the sync daemon's sockets")]
    pub(super) daemon_dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Path to the applet config file")]
    pub(super) config: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Option<Commands>,
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Inspect repos known to the local daemon")]
    Repos(ReposArgs),
    #[command(about = "Turn global auto sync on or off")]
    AutoSync(AutoSyncArgs),
    #[command(about = "Manage download tasks")]
    CloneTasks(CloneTasksArgs),
    #[command(about = "Read or write daemon config values")]
    Config(ConfigArgs),
    #[command(about = "Download a server repo into a new local folder")]
    Download(DownloadArgs),
    #[command(about = "Manage server accounts")]
    Account(AccountArgs),
    #[command(about = "Launch terminal UI")]
    Tui,
}

#[derive(Parser)]
pub(super) struct ReposArgs {
    #[command(subcommand)]
    pub(super) command: ReposCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ReposCommands {
    #[command(about = "List local repos with their sync status")]
    List,
    #[command(about = "Show one local repo")]
    Show(RepoIdArgs),
    #[command(about = "Print whether a repo exists locally")]
    Has(RepoIdArgs),
}

#[derive(Parser)]
pub(super) struct RepoIdArgs {
    pub(super) repo_id: String,
}

#[derive(Parser)]
pub(super) struct AutoSyncArgs {
    #[arg(value_enum)]
    pub(super) state: Toggle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(super) enum Toggle {
    On,
    Off,
}

#[derive(Parser)]
pub(super) struct CloneTasksArgs {
    #[command(subcommand)]
    pub(super) command: CloneTasksCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum CloneTasksCommands {
    #[command(about = "List download tasks")]
    List,
    #[command(about = "Print the number of download tasks")]
    Count,
    #[command(about = "Cancel a running download")]
    Cancel(RepoIdArgs),
    #[command(about = "Remove a finished or failed download")]
    Remove(RepoIdArgs),
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Read a config value")]
    Get(ConfigGetArgs),
    #[command(about = "Write a config value")]
    Set(ConfigSetArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(super) enum ServiceValue {
    Sync,
    Peer,
}

impl From<ServiceValue> for Service {
    fn from(value: ServiceValue) -> Self {
        match value {
            ServiceValue::Sync => Service::Sync,
            ServiceValue::Peer => Service::Peer,
        }
    }
}

#[derive(Parser)]
pub(super) struct ConfigGetArgs {
    #[arg(long, value_enum, default_value = "sync")]
    pub(super) service: ServiceValue,
    #[arg(long, help = "Treat the value as an integer")]
    pub(super) int: bool,
    pub(super) key: String,
}

#[derive(Parser)]
pub(super) struct ConfigSetArgs {
    #[arg(long, value_enum, default_value = "sync")]
    pub(super) service: ServiceValue,
    #[arg(long, help = "Treat the value as an integer")]
    pub(super) int: bool,
    pub(super) key: String,
    pub(super) value: String,
}

#[derive(Parser)]
pub(super) struct DownloadArgs {
    pub(super) repo_id: String,
    #[arg(long, help = "Folder the repo's own folder is created in")]
    pub(super) parent_dir: PathBuf,
    #[arg(long, help = "Password for an encrypted repo")]
    pub(super) password: Option<String>,
}

#[derive(Parser)]
pub(super) struct AccountArgs {
    #[command(subcommand)]
    pub(super) command: AccountCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum AccountCommands {
    #[command(about = "Add or replace an account and make it current")]
    Add(AccountAddArgs),
    #[command(about = "List configured accounts")]
    List,
}

#[derive(Parser)]
pub(super) struct AccountAddArgs {
    #[arg(long)]
    pub(super) server: String,
    #[arg(long)]
    pub(super) username: String,
    #[arg(long)]
    pub(super) token: String,
}

pub(super) fn command_label(command: Option<&Commands>) -> &'static str {
    match command {
        None | Some(Commands::Tui) => "tui",
        Some(Commands::Repos(_)) => "repos",
        Some(Commands::AutoSync(_)) => "auto-sync",
        Some(Commands::CloneTasks(_)) => "clone-tasks",
        Some(Commands::Config(_)) => "config",
        Some(Commands::Download(_)) => "download",
        Some(Commands::Account(_)) => "account",
    }
}
