//! Server configuration.
//!
//! Every flag can also be set through its environment variable; all have
//! defaults so a bare `rundown-server` starts on port 4000.

use clap::Parser;
use rundown_core::default_log_level;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Rundown back-office HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "rundown-server", version)]
pub struct Args {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = 4000)]
    pub port: u16,

    /// HTTP basic-auth username
    #[arg(long, env = "RUNDOWN_USER", default_value = "user")]
    pub user: String,

    /// HTTP basic-auth password
    #[arg(long, env = "RUNDOWN_PASS", default_value = "pass", hide_env_values = true)]
    pub pass: String,

    /// Dataset JSON file; must exist at startup
    #[arg(long, env = "RUNDOWN_FILENAME", default_value = "rundown.json")]
    pub filename: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUNDOWN_LOG_LEVEL", default_value_t = default_log_level().to_string())]
    pub log_level: String,

    /// Absolute directory for rotated log files; logs go to stderr when unset
    #[arg(long, env = "RUNDOWN_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Seed for story placement, for reproducible runs
    #[arg(long, env = "RUNDOWN_SEED")]
    pub seed: Option<u64>,
}

impl Args {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::Args;
    use clap::Parser;

    #[test]
    fn explicit_flags_override_defaults() {
        let args = Args::try_parse_from([
            "rundown-server",
            "--port",
            "8080",
            "--user",
            "editor",
            "--filename",
            "/srv/rundown.json",
            "--seed",
            "9",
        ])
        .expect("flags should parse");
        assert_eq!(args.port, 8080);
        assert_eq!(args.user, "editor");
        assert_eq!(args.filename.to_str(), Some("/srv/rundown.json"));
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.listen_addr().port(), 8080);
    }

    #[test]
    fn rejects_non_numeric_port() {
        assert!(Args::try_parse_from(["rundown-server", "--port", "http"]).is_err());
    }
}
