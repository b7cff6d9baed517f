use crate::bag::PropertyBag;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum CloneState {
    Init,
    Connect,
    Index,
    Fetch,
    Checkout,
    Merge,
    Done,
    Error,
    Canceling,
    Canceled,
    Other(String),
}

impl CloneState {
    pub fn parse(token: &str) -> Self {
        match token {
            "init" => CloneState::Init,
            "connect" => CloneState::Connect,
            "index" => CloneState::Index,
            "fetch" => CloneState::Fetch,
            "checkout" => CloneState::Checkout,
            "merge" => CloneState::Merge,
            "done" => CloneState::Done,
            "error" => CloneState::Error,
            "canceling" => CloneState::Canceling,
            "canceled" => CloneState::Canceled,
            other => CloneState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CloneState::Init => "init",
            CloneState::Connect => "connect",
            CloneState::Index => "index",
            CloneState::Fetch => "fetch",
            CloneState::Checkout => "checkout",
            CloneState::Merge => "merge",
            CloneState::Done => "done",
            CloneState::Error => "error",
            CloneState::Canceling => "canceling",
            CloneState::Canceled => "canceled",
            CloneState::Other(token) => token,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CloneState::Init => "Initializing",
            CloneState::Connect => "Connecting server",
            CloneState::Index => "Indexing files",
            CloneState::Fetch => "Downloading",
            CloneState::Checkout => "Creating folder",
            CloneState::Merge => "Merge file changes",
            CloneState::Done => "Done",
            CloneState::Error => "Error",
            CloneState::Canceling => "Canceling",
            CloneState::Canceled => "Canceled",
            CloneState::Other(token) => token,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, CloneState::Done | CloneState::Canceled)
    }
}

impl fmt::Display for CloneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An in-progress or failed download of a repo to local disk.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CloneTask {
    pub repo_id: String,
    pub repo_name: String,
    pub worktree: PathBuf,
    pub state: CloneState,
    pub error_str: Option<String>,
    pub block_done: i64,
    pub block_total: i64,
    pub checkout_done: i64,
    pub checkout_total: i64,
    pub state_label: String,
    pub error_label: Option<String>,
}

impl CloneTask {
    pub fn from_bag(bag: &PropertyBag) -> Self {
        let state = CloneState::parse(&bag.str_or_default("state"));
        Self {
            repo_id: bag.str_or_default("repo_id"),
            repo_name: bag.str_or_default("repo_name"),
            worktree: PathBuf::from(bag.str_or_default("worktree")),
            state_label: state.label().to_string(),
            state,
            error_str: bag.opt_str("error_str").filter(|value| !value.is_empty()),
            block_done: 0,
            block_total: 0,
            checkout_done: 0,
            checkout_total: 0,
            error_label: None,
        }
    }

    /// Fills `state_label` and `error_label` from the raw state tokens and
    /// whatever progress numbers are present.
    pub fn translate_state_info(&mut self) {
        self.state_label = match self.state {
            CloneState::Fetch => match percent(self.block_done, self.block_total) {
                Some(pct) => format!("{} {pct}%", self.state.label()),
                None => self.state.label().to_string(),
            },
            CloneState::Checkout if self.checkout_total > 0 => format!(
                "{} {}/{}",
                self.state.label(),
                self.checkout_done.min(self.checkout_total),
                self.checkout_total
            ),
            _ => self.state.label().to_string(),
        };
        self.error_label = match self.state {
            CloneState::Error => Some(translate_error(self.error_str.as_deref())),
            _ => None,
        };
    }

    pub fn progress_percent(&self) -> Option<u8> {
        match self.state {
            CloneState::Fetch => percent(self.block_done, self.block_total),
            CloneState::Checkout => percent(self.checkout_done, self.checkout_total),
            CloneState::Done => Some(100),
            _ => None,
        }
    }

    pub fn display_state(&self) -> String {
        match self.error_label.as_deref() {
            Some(error) => format!("{}: {error}", self.state_label),
            None => self.state_label.clone(),
        }
    }
}

fn percent(done: i64, total: i64) -> Option<u8> {
    if total <= 0 {
        return None;
    }
    let done = done.clamp(0, total);
    Some(((done * 100) / total) as u8)
}

fn translate_error(error: Option<&str>) -> String {
    match error {
        None | Some("") => "Unknown error".to_string(),
        Some("index") => "Failed to index local files".to_string(),
        Some("fetch") => "Failed to download files".to_string(),
        Some("checkout") => "Failed to create local files".to_string(),
        Some("merge") => "Failed to merge local file changes".to_string(),
        Some("password") => "Incorrect password, please download again".to_string(),
        Some("internal") => "Internal error".to_string(),
        Some(other) => other.to_string(),
    }
}
