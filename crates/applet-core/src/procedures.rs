//! Remote procedure names exposed by the daemon's two RPC services.

pub const SYNC_SERVICE: &str = "sync-rpcserver";
pub const PEER_SERVICE: &str = "peer-rpcserver";

pub const GET_REPO_LIST: &str = "sync_get_repo_list";
pub const GET_REPO: &str = "sync_get_repo";
pub const ENABLE_AUTO_SYNC: &str = "sync_enable_auto_sync";
pub const DISABLE_AUTO_SYNC: &str = "sync_disable_auto_sync";
pub const DOWNLOAD: &str = "sync_download";
pub const CLONE: &str = "sync_clone";
pub const GET_REPO_SYNC_TASK: &str = "sync_get_repo_sync_task";
pub const GET_CLONE_TASKS: &str = "sync_get_clone_tasks";
pub const FIND_TRANSFER_TASK: &str = "sync_find_transfer_task";
pub const GET_CHECKOUT_TASK: &str = "sync_get_checkout_task";
pub const CANCEL_CLONE_TASK: &str = "sync_cancel_clone_task";
pub const REMOVE_CLONE_TASK: &str = "sync_remove_clone_task";

pub const SYNC_GET_CONFIG: &str = "sync_get_config";
pub const SYNC_GET_CONFIG_INT: &str = "sync_get_config_int";
pub const SYNC_SET_CONFIG: &str = "sync_set_config";
pub const SYNC_SET_CONFIG_INT: &str = "sync_set_config_int";

pub const PEER_GET_CONFIG: &str = "get_config";
pub const PEER_GET_CONFIG_INT: &str = "get_config_int";
pub const PEER_SET_CONFIG: &str = "set_config";
pub const PEER_SET_CONFIG_INT: &str = "set_config_int";
