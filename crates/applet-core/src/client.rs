use crate::bag::PropertyBag;
use crate::clone_task::{CloneState, CloneTask};
use crate::config::{ConfigError, DaemonConfig, Settings};
use crate::model::LocalRepo;
use crate::procedures as proc;
use crate::rpc::{RpcArg, RpcError, RpcTransport};
use crate::rpc_socket::SocketTransport;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

pub const AUTO_SYNC_OFF: &str = "auto sync is turned off";
pub const SYNC_UNKNOWN: &str = "unknown";
pub const WAITING_FOR_SYNC: &str = "waiting for sync";
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not connected to the sync daemon")]
    NotConnected,
    #[error(transparent)]
    Rpc(#[from] RpcError),
    #[error("repo {0} not found")]
    NotFound(String),
    #[error("{0}")]
    Daemon(String),
}

/// The two daemon endpoints a client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Service {
    Sync,
    Peer,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Sync => proc::SYNC_SERVICE,
            Service::Peer => proc::PEER_SERVICE,
        }
    }

    fn get_config(self) -> &'static str {
        match self {
            Service::Sync => proc::SYNC_GET_CONFIG,
            Service::Peer => proc::PEER_GET_CONFIG,
        }
    }

    fn get_config_int(self) -> &'static str {
        match self {
            Service::Sync => proc::SYNC_GET_CONFIG_INT,
            Service::Peer => proc::PEER_GET_CONFIG_INT,
        }
    }

    fn set_config(self) -> &'static str {
        match self {
            Service::Sync => proc::SYNC_SET_CONFIG,
            Service::Peer => proc::PEER_SET_CONFIG,
        }
    }

    fn set_config_int(self) -> &'static str {
        match self {
            Service::Sync => proc::SYNC_SET_CONFIG_INT,
            Service::Peer => proc::PEER_SET_CONFIG_INT,
        }
    }
}

/// Everything the daemon needs to start downloading a repo.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DownloadRequest {
    pub repo_id: String,
    pub relay_id: String,
    pub name: String,
    pub worktree: String,
    pub token: String,
    pub password: Option<String>,
    pub magic: Option<String>,
    pub peer_addr: String,
    pub port: String,
    pub email: String,
}

impl DownloadRequest {
    pub fn to_args(&self) -> Vec<RpcArg> {
        vec![
            RpcArg::str(&self.repo_id),
            RpcArg::str(&self.relay_id),
            RpcArg::str(&self.name),
            RpcArg::str(&self.worktree),
            RpcArg::str(&self.token),
            RpcArg::opt_str(self.password.as_deref()),
            RpcArg::opt_str(self.magic.as_deref()),
            RpcArg::str(&self.peer_addr),
            RpcArg::str(&self.port),
            RpcArg::str(&self.email),
        ]
    }
}

struct Handles {
    sync: Box<dyn RpcTransport>,
    peer: Box<dyn RpcTransport>,
}

/// Typed adapter over the daemon's sync and peer RPC services.
///
/// A client built by [`RpcClient::connect`] may hold no handles when the
/// daemon is not running; every remote operation then fails with
/// [`ClientError::NotConnected`].
pub struct RpcClient {
    handles: Option<Handles>,
    settings: Settings,
}

impl RpcClient {
    pub fn connect(config_dir: &Path, settings: Settings) -> Result<Self, ConfigError> {
        let config = DaemonConfig::load(config_dir)?;
        let timeout = config.timeout();
        let sync = SocketTransport::connect(&config.sync_socket, proc::SYNC_SERVICE, timeout);
        let peer = SocketTransport::connect(&config.peer_socket, proc::PEER_SERVICE, timeout);
        match (sync, peer) {
            (Ok(sync), Ok(peer)) => {
                info!(dir = %config_dir.display(), "connected to daemon");
                Ok(Self::with_transports(Box::new(sync), Box::new(peer), settings))
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(dir = %config_dir.display(), error = %err, "daemon not reachable");
                Ok(Self::disconnected(settings))
            }
        }
    }

    pub fn disconnected(settings: Settings) -> Self {
        Self {
            handles: None,
            settings,
        }
    }

    pub fn with_transports(
        sync: Box<dyn RpcTransport>,
        peer: Box<dyn RpcTransport>,
        settings: Settings,
    ) -> Self {
        Self {
            handles: Some(Handles { sync, peer }),
            settings,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.handles.is_some()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn rpc(&mut self, service: Service) -> Result<&mut dyn RpcTransport, ClientError> {
        let handles = self.handles.as_mut().ok_or(ClientError::NotConnected)?;
        Ok(match service {
            Service::Sync => handles.sync.as_mut(),
            Service::Peer => handles.peer.as_mut(),
        })
    }

    pub fn list_local_repos(&mut self) -> Result<Vec<LocalRepo>, ClientError> {
        let bags = self
            .rpc(Service::Sync)?
            .call_objlist(proc::GET_REPO_LIST, &[RpcArg::Int(-1), RpcArg::Int(-1)])
            .inspect_err(|err| warn!(error = %err, "failed to get repo list"))?;
        Ok(bags.iter().map(LocalRepo::from_bag).collect())
    }

    /// Turns global auto sync on or off; the settings follow on success.
    pub fn set_auto_sync(&mut self, enabled: bool) -> Result<i64, ClientError> {
        let procedure = if enabled {
            proc::ENABLE_AUTO_SYNC
        } else {
            proc::DISABLE_AUTO_SYNC
        };
        let code = self.rpc(Service::Sync)?.call_int(procedure, &[])?;
        if code < 0 {
            return Err(ClientError::Daemon(UNKNOWN_ERROR.to_string()));
        }
        self.settings.auto_sync = enabled;
        info!(enabled, "auto sync toggled");
        Ok(code)
    }

    pub fn download_repo(&mut self, request: &DownloadRequest) -> Result<(), ClientError> {
        self.start_clone(proc::DOWNLOAD, request)
    }

    pub fn clone_repo(&mut self, request: &DownloadRequest) -> Result<(), ClientError> {
        self.start_clone(proc::CLONE, request)
    }

    fn start_clone(&mut self, procedure: &str, request: &DownloadRequest) -> Result<(), ClientError> {
        self.rpc(Service::Sync)?
            .call_string(procedure, &request.to_args())
            .inspect_err(|err| warn!(procedure, repo_id = %request.repo_id, error = %err, "clone request failed"))?;
        info!(procedure, repo_id = %request.repo_id, worktree = %request.worktree, "clone requested");
        Ok(())
    }

    /// Fetches one repo and refreshes its sync status.
    pub fn get_local_repo(&mut self, repo_id: &str) -> Result<LocalRepo, ClientError> {
        let bag = self
            .rpc(Service::Sync)?
            .call_object(proc::GET_REPO, &[RpcArg::str(repo_id)])?
            .ok_or_else(|| ClientError::NotFound(repo_id.to_string()))?;
        let mut repo = LocalRepo::from_bag(&bag);
        drop(bag);
        if !repo.is_valid() {
            return Err(ClientError::NotFound(repo_id.to_string()));
        }
        self.get_sync_status(&mut repo);
        Ok(repo)
    }

    pub fn has_local_repo(&mut self, repo_id: &str) -> bool {
        self.get_local_repo(repo_id).is_ok()
    }

    pub fn get_config(&mut self, service: Service, key: &str) -> Result<Option<String>, ClientError> {
        Ok(self
            .rpc(service)?
            .call_string(service.get_config(), &[RpcArg::str(key)])?)
    }

    pub fn get_config_int(&mut self, service: Service, key: &str) -> Result<i64, ClientError> {
        Ok(self
            .rpc(service)?
            .call_int(service.get_config_int(), &[RpcArg::str(key)])?)
    }

    pub fn set_config(&mut self, service: Service, key: &str, value: &str) -> Result<(), ClientError> {
        self.rpc(service)?
            .call_int(service.set_config(), &[RpcArg::str(key), RpcArg::str(value)])?;
        Ok(())
    }

    pub fn set_config_int(&mut self, service: Service, key: &str, value: i64) -> Result<(), ClientError> {
        self.rpc(service)?
            .call_int(service.set_config_int(), &[RpcArg::str(key), RpcArg::Int(value)])?;
        Ok(())
    }

    pub fn get_sync_status(&mut self, repo: &mut LocalRepo) {
        if !repo.auto_sync || !self.settings.auto_sync {
            repo.set_sync_info(AUTO_SYNC_OFF, None);
            return;
        }

        let task = self.rpc(Service::Sync).and_then(|rpc| {
            rpc.call_object(proc::GET_REPO_SYNC_TASK, &[RpcArg::str(&repo.id)])
                .map_err(ClientError::from)
        });
        match task {
            Err(err) => {
                debug!(repo_id = %repo.id, error = %err, "sync task lookup failed");
                repo.set_sync_info(SYNC_UNKNOWN, None);
            }
            Ok(None) => repo.set_sync_info(WAITING_FOR_SYNC, None),
            Ok(Some(task)) => {
                let state = task.str_or_default("state");
                let error = if state == "error" {
                    task.opt_str("error")
                } else {
                    None
                };
                repo.set_sync_info(state, error);
            }
        }
    }

    pub fn get_clone_tasks(&mut self) -> Result<Vec<CloneTask>, ClientError> {
        let bags = self
            .rpc(Service::Sync)?
            .call_objlist(proc::GET_CLONE_TASKS, &[])?;
        let mut tasks = Vec::with_capacity(bags.len());
        for bag in bags {
            let mut task = CloneTask::from_bag(&bag);
            match task.state {
                CloneState::Fetch => self.get_transfer_detail(&mut task),
                CloneState::Checkout => self.get_checkout_detail(&mut task),
                CloneState::Error if task.error_str.as_deref() == Some("fetch") => {
                    self.get_transfer_detail(&mut task)
                }
                _ => {}
            }
            task.translate_state_info();
            tasks.push(task);
        }
        Ok(tasks)
    }

    /// Copies transfer progress into `task`; failed tasks also take the
    /// transfer's error. Lookup failures leave the task untouched.
    pub fn get_transfer_detail(&mut self, task: &mut CloneTask) {
        let Some(transfer) = self.lookup_task(proc::FIND_TRANSFER_TASK, &task.repo_id) else {
            return;
        };
        if task.state == CloneState::Error {
            task.error_str = transfer.opt_str("error_str").filter(|error| !error.is_empty());
        }
        task.block_done = transfer.int_or_default("block_done");
        task.block_total = transfer.int_or_default("block_total");
    }

    pub fn get_checkout_detail(&mut self, task: &mut CloneTask) {
        let Some(checkout) = self.lookup_task(proc::GET_CHECKOUT_TASK, &task.repo_id) else {
            return;
        };
        task.checkout_done = checkout.int_or_default("finished_files");
        task.checkout_total = checkout.int_or_default("total_files");
    }

    fn lookup_task(&mut self, procedure: &str, repo_id: &str) -> Option<PropertyBag> {
        let result = self.rpc(Service::Sync).and_then(|rpc| {
            rpc.call_object(procedure, &[RpcArg::str(repo_id)])
                .map_err(ClientError::from)
        });
        match result {
            Ok(Some(bag)) => Some(bag),
            Ok(None) => {
                debug!(procedure, repo_id, "no task object");
                None
            }
            Err(err) => {
                debug!(procedure, repo_id, error = %err, "task lookup failed");
                None
            }
        }
    }

    pub fn cancel_clone_task(&mut self, repo_id: &str) -> Result<i64, ClientError> {
        self.clone_task_op(proc::CANCEL_CLONE_TASK, repo_id)
    }

    pub fn remove_clone_task(&mut self, repo_id: &str) -> Result<i64, ClientError> {
        self.clone_task_op(proc::REMOVE_CLONE_TASK, repo_id)
    }

    fn clone_task_op(&mut self, procedure: &str, repo_id: &str) -> Result<i64, ClientError> {
        let result = self
            .rpc(Service::Sync)?
            .call_int(procedure, &[RpcArg::str(repo_id)]);
        match result {
            Ok(code) if code >= 0 => Ok(code),
            Ok(code) => {
                warn!(procedure, repo_id, code, "clone task operation failed");
                Err(ClientError::Daemon(UNKNOWN_ERROR.to_string()))
            }
            Err(RpcError::Remote { message, .. }) if message.is_empty() => {
                Err(ClientError::Daemon(UNKNOWN_ERROR.to_string()))
            }
            Err(err) => {
                warn!(procedure, repo_id, error = %err, "clone task operation failed");
                Err(ClientError::Daemon(err.to_string()))
            }
        }
    }

    /// Number of clone tasks; a failed fetch is an error, never zero.
    pub fn get_clone_tasks_count(&mut self) -> Result<usize, ClientError> {
        let tasks = self
            .rpc(Service::Sync)?
            .call_objlist(proc::GET_CLONE_TASKS, &[])?;
        Ok(tasks.len())
    }
}
