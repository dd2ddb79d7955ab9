// Configuration module entry point
// CLI flags, layered file/env/default loading, and the immutable runtime state

mod state;
mod types;

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

pub use state::ServerState;
pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

/// Command-line options. Every flag overrides the config file and the
/// `STATICD_*` environment.
#[derive(Parser, Debug, Clone)]
#[command(name = "staticd", version, about = "Static file server", long_about = None)]
pub struct Cli {
    /// Address to bind
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory to serve
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Configuration file name, without extension
    #[arg(short, long, default_value = "staticd")]
    pub config: String,

    /// Tokio worker thread count
    #[arg(long)]
    pub workers: Option<usize>,
}

impl Config {
    /// Load configuration in precedence order:
    /// defaults < config file (optional) < environment < CLI flags
    pub fn load(cli: &Cli) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.bind", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root", ".")?
            .set_default("http.server_name", "staticd/0.1")?
            .set_default("http.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", true)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .add_source(config::File::with_name(&cli.config).required(false))
            .add_source(
                config::Environment::with_prefix("STATICD")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option("server.bind", cli.bind.clone())?
            .set_override_option("server.port", cli.port.map(u64::from))?
            .set_override_option(
                "server.root",
                cli.root.as_ref().map(|p| p.display().to_string()),
            )?
            .set_override_option("server.workers", cli.workers.map(|w| w as u64))?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.bind, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid bind address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            bind: None,
            port: None,
            root: None,
            config: "staticd-test-missing".to_string(),
            workers: None,
        }
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let cfg = Config::load(&bare_cli()).expect("load");
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.root, PathBuf::from("."));
        assert_eq!(cfg.http.index_files, vec!["index.html", "index.htm"]);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.performance.keep_alive_timeout, 75);
    }

    #[test]
    fn cli_flags_override_defaults() {
        let mut cli = bare_cli();
        cli.bind = Some("127.0.0.1".to_string());
        cli.port = Some(9090);
        cli.root = Some(PathBuf::from("/srv/site"));
        let cfg = Config::load(&cli).expect("load");
        assert_eq!(cfg.server.bind, "127.0.0.1");
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.root, PathBuf::from("/srv/site"));
    }

    #[test]
    fn socket_addr_combines_bind_and_port() {
        let cfg = Config::load(&bare_cli()).expect("load");
        let addr = cfg.socket_addr().expect("addr");
        assert_eq!(addr.port(), 8080);
        assert!(addr.ip().is_unspecified());
    }

    #[test]
    fn socket_addr_rejects_garbage_bind() {
        let mut cli = bare_cli();
        cli.bind = Some("not an address".to_string());
        let cfg = Config::load(&cli).expect("load");
        assert!(cfg.socket_addr().is_err());
    }
}
