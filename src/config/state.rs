// Runtime state module
// The immutable startup snapshot shared by every connection task

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Server state created once at startup and shared via `Arc`.
///
/// Nothing in here is ever mutated; connection tasks only read it.
pub struct ServerState {
    pub config: Config,
    /// Canonicalized root directory. Every resolved request path must stay
    /// inside this prefix.
    pub root: PathBuf,
}

impl ServerState {
    /// Canonicalize the configured root once. A missing or unreadable root
    /// is a startup error rather than a permanent 404.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = config.server.root.canonicalize().map_err(|e| {
            io::Error::new(
                e.kind(),
                format!("root directory {}: {e}", config.server.root.display()),
            )
        })?;
        Ok(Self { config, root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Cli;

    fn config_with_root(root: &std::path::Path) -> Config {
        let cli = Cli {
            bind: None,
            port: None,
            root: Some(root.to_path_buf()),
            config: "staticd-test-missing".to_string(),
            workers: None,
        };
        Config::load(&cli).expect("load")
    }

    #[test]
    fn canonicalizes_existing_root() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let state = ServerState::new(config_with_root(dir.path())).expect("state");
        assert_eq!(state.root, dir.path().canonicalize().expect("canonicalize"));
    }

    #[test]
    fn missing_root_is_a_startup_error() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let gone = dir.path().join("no-such-dir");
        assert!(ServerState::new(config_with_root(&gone)).is_err());
    }
}
