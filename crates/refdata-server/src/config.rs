//! Server configuration.

use std::path::PathBuf;

use clap::Parser;

/// Refdata HTTP server command line arguments.
#[derive(Debug, Parser)]
#[command(name = "refdata-server")]
#[command(about = "HTTP/JSON API for versioned reference data")]
pub struct Args {
    /// Address to listen on for HTTP requests.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    pub listen: String,

    /// Path to the data directory.
    #[arg(short, long, default_value = "./refdata_data")]
    pub data: PathBuf,

    /// Page cache capacity in megabytes.
    #[arg(long, default_value_t = 256)]
    pub cache_capacity_mb: u64,
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on for HTTP requests.
    pub listen_addr: String,
    /// Path to the data directory.
    pub data_path: PathBuf,
    /// Page cache capacity in bytes.
    pub cache_capacity: u64,
}

impl From<&Args> for ServerConfig {
    fn from(args: &Args) -> Self {
        Self {
            listen_addr: args.listen.clone(),
            data_path: args.data.clone(),
            cache_capacity: args.cache_capacity_mb * 1024 * 1024,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            data_path: PathBuf::from("./refdata_data"),
            cache_capacity: 256 * 1024 * 1024,
        }
    }
}
