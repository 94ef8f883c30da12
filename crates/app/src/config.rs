use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_ADMIN_USER: &str = "admin";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_CREDENTIALS_FILE: &str = "users.toml";
const TEST_DATA_DIR: &str = "test/data";
const TEST_CREDENTIALS_FILE: &str = "test/users.toml";

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "vellum flat-file CMS server")]
pub struct Args {
    #[arg(
        short = 'l',
        long,
        env = "VELLUM_LISTEN",
        default_value = "127.0.0.1:8080",
        help = "Bind address for the HTTP server"
    )]
    pub listen: SocketAddr,
    #[arg(
        long,
        env = "VELLUM_DATA_DIR",
        help = "Document storage directory (defaults per VELLUM_ENV)"
    )]
    pub data_dir: Option<PathBuf>,
    #[arg(
        long,
        env = "VELLUM_CREDENTIALS",
        help = "Credential file path (defaults per VELLUM_ENV)"
    )]
    pub credentials: Option<PathBuf>,
    #[arg(
        long,
        env = "VELLUM_ADMIN_USER",
        default_value = DEFAULT_ADMIN_USER,
        help = "Username allowed to manage documents"
    )]
    pub admin_user: String,
    #[arg(
        long,
        env = "VELLUM_SESSION_SECRET",
        help = "Cookie signing secret, at least 32 bytes (generated when absent)"
    )]
    pub session_secret: Option<String>,
    #[arg(
        long,
        env = "VELLUM_LOG_LEVEL",
        default_value = "info",
        help = "Log level"
    )]
    pub log_level: tracing::Level,
    #[arg(
        long,
        env = "VELLUM_LOG_DIR",
        help = "Directory for log files (logs to stdout only if not set)"
    )]
    pub log_dir: Option<PathBuf>,
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Flat directory holding the documents.
    pub data_dir: PathBuf,
    /// TOML file mapping usernames to password hashes.
    pub credentials_path: PathBuf,
    /// The single privileged identity.
    pub admin_user: String,
    /// Cookie signing secret. A fresh key is generated per process when
    /// unset, which invalidates sessions across restarts.
    pub session_secret: Option<String>,
    pub log_level: tracing::Level,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Resolve configuration from parsed arguments and the process
    /// environment. `VELLUM_ENV=test` switches the default storage roots to
    /// the test tree; explicit flags win over the toggle.
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let test_env = std::env::var("VELLUM_ENV").is_ok_and(|v| v == "test");
        let (default_data, default_credentials) = if test_env {
            (TEST_DATA_DIR, TEST_CREDENTIALS_FILE)
        } else {
            (DEFAULT_DATA_DIR, DEFAULT_CREDENTIALS_FILE)
        };

        if let Some(secret) = &args.session_secret {
            if secret.len() < 32 {
                return Err(ConfigError::SessionSecretTooShort);
            }
        }

        Ok(Self {
            listen_addr: args.listen,
            data_dir: args
                .data_dir
                .unwrap_or_else(|| PathBuf::from(default_data)),
            credentials_path: args
                .credentials
                .unwrap_or_else(|| PathBuf::from(default_credentials)),
            admin_user: args.admin_user,
            session_secret: args.session_secret,
            log_level: args.log_level,
            log_dir: args.log_dir,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("session secret must be at least 32 bytes")]
    SessionSecretTooShort,
}
