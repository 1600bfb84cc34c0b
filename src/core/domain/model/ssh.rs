//! SSH invocation parameters.

use crate::core::domain::model::connection_target::ConnectionTarget;
use std::path::{Path, PathBuf};

pub const DEFAULT_SSH_USER: &str = "admin";
/// Default key, relative to the user's home directory.
pub const DEFAULT_SSH_KEY: &str = ".ssh/admin_id_ecdsa";

/// User and private key used for a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshOptions {
    pub user: String,
    pub key_path: PathBuf,
}

impl SshOptions {
    pub fn new(user: impl Into<String>, key_path: impl Into<PathBuf>) -> Self {
        Self {
            user: user.into(),
            key_path: expand_home(&key_path.into()),
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_key_path(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.key_path = expand_home(&key_path.into());
        self
    }
}

impl Default for SshOptions {
    fn default() -> Self {
        let key_path = dirs::home_dir()
            .map(|home| home.join(DEFAULT_SSH_KEY))
            .unwrap_or_else(|| PathBuf::from("~").join(DEFAULT_SSH_KEY));
        Self {
            user: DEFAULT_SSH_USER.to_string(),
            key_path,
        }
    }
}

/// Replaces a leading `~` with the home directory, if one is known.
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

/// A fully built command line, ready for an executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SshCommand {
    /// `ssh -i <key> <user>@<address>`
    pub fn new(target: &ConnectionTarget, options: &SshOptions) -> Self {
        Self {
            program: "ssh".to_string(),
            args: vec![
                "-i".to_string(),
                options.key_path.display().to_string(),
                format!("{}@{}", options.user, target.address),
            ],
        }
    }
}
