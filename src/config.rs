//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// AIGuidebook server
///
/// HTTP service for logging AI tool usage on assignments, submitting usage
/// declarations, and reviewing risk classifications and alerts.
#[derive(Parser, Debug, Clone)]
#[command(name = "aiguidebook-server")]
#[command(about = "AIGuidebook - AI usage logging and declaration review", long_about = None)]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "AIGUIDEBOOK_BIND", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    /// Directory for the embedded database
    #[arg(long, env = "AIGUIDEBOOK_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Secret used to verify bearer tokens
    #[arg(
        long,
        env = "AIGUIDEBOOK_AUTH_SECRET",
        default_value = "dev-secret",
        hide_env_values = true
    )]
    pub auth_secret: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::parse_from(["aiguidebook-server"]);
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.auth_secret, "dev-secret");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::parse_from([
            "aiguidebook-server",
            "--bind",
            "0.0.0.0:8080",
            "--data-dir",
            "/tmp/aiguidebook",
            "--auth-secret",
            "prod-secret",
        ]);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.auth_secret, "prod-secret");
    }
}
