use std::net::SocketAddr;

use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable, one line per event
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Runtime configuration for the `letterhouse` binary.
///
/// Every value can be given as a CLI flag or an environment variable; a
/// `.env` file in the working directory is loaded first.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "letterhouse",
    version,
    about = "Letter request desk with worker auto-assignment"
)]
pub struct CliArgs {
    /// SQLite connection URL. The database file is created if missing.
    ///
    /// Environment variable: `DATABASE_URL`
    #[arg(long, env = "DATABASE_URL", default_value_t = String::from("sqlite://letterhouse.db?mode=rwc"))]
    pub database_url: String,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Maximum number of pooled SQLite connections.
    ///
    /// Environment variable: `DB_MAX_CONNECTIONS`
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 5)]
    pub db_max_connections: u32,

    /// Log output format. Filtering is controlled by `RUST_LOG`.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub server_addr: SocketAddr,
    pub db_max_connections: u32,
    pub log_format: LogFormat,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be greater than 0");
        }

        if args.database_url.trim().is_empty() {
            bail!("DATABASE_URL must not be empty");
        }

        let server_addr = args
            .server_addr
            .parse()
            .with_context(|| format!("SERVER_ADDR '{}' is not a socket address", args.server_addr))?;

        Ok(Self {
            database_url: args.database_url,
            server_addr,
            db_max_connections: args.db_max_connections,
            log_format: args.log_format,
        })
    }
}
