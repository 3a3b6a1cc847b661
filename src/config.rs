//! Command line and environment configuration.
//!
//! Every flag falls back to an environment variable; `.env` is loaded by `main`
//! before parsing.

use clap::Parser;
use resource_framework::http::{ApiSettings, DEFAULT_APPLICATION_NAME};
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "marketplace")]
#[command(about = "CRUD resource service for the art marketplace")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(short, long, env = "SERVER_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Snapshot loaded at startup and written on shutdown. Without it the store is memory only.
    #[arg(long, env = "MARKETPLACE_DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Prefix of the alert and error headers (`X-{app}-alert`)
    #[arg(long, env = "MARKETPLACE_APP_NAME", default_value = DEFAULT_APPLICATION_NAME)]
    pub app_name: String,

    /// Requests queued per table before callers wait
    #[arg(long, env = "MARKETPLACE_CHANNEL_CAPACITY", default_value_t = 32)]
    pub channel_capacity: usize,

    #[arg(long, env = "MARKETPLACE_DEFAULT_PAGE_SIZE", default_value_t = 20)]
    pub default_page_size: u32,

    #[arg(long, env = "MARKETPLACE_MAX_PAGE_SIZE", default_value_t = 2000)]
    pub max_page_size: u32,
}

impl Config {
    pub fn bind_address(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address {addr}: {e}"))
    }

    /// The default page size never exceeds the maximum.
    pub fn api_settings(&self) -> ApiSettings {
        let max_page_size = self.max_page_size.max(1);
        ApiSettings {
            application_name: self.app_name.clone(),
            default_page_size: self.default_page_size.clamp(1, max_page_size),
            max_page_size,
        }
    }
}
