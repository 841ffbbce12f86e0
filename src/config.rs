use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Fedra federation server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "fedra-server", version, about = "Fedra federation server")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "FEDRA_PORT", default_value = "3000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "FEDRA_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./fedra.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "FEDRA_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Data directory for persistent state (DB, keys)
    #[arg(long, env = "FEDRA_DATA_DIR", default_value = "./data")]
    pub data_dir: String,

    /// Public base URL of this server, used in Link pagination headers
    /// and ActivityPub actor URIs (no trailing slash)
    #[arg(long, env = "FEDRA_BASE_URL", default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Listing API configuration (loaded from [api] section in TOML)
    #[arg(skip)]
    #[serde(default)]
    pub api: Option<ApiConfig>,

    /// Federation delivery configuration (loaded from [federation] section in TOML)
    #[arg(skip)]
    #[serde(default)]
    pub federation: Option<FederationConfig>,
}

/// Configuration for the cursor-paginated listing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Page size when a listing request carries no limit parameter (default: 40)
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Hard ceiling on requested page sizes (default: 80)
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            default_page_limit: 40,
            max_page_limit: 80,
        }
    }
}

fn default_page_limit() -> usize {
    40
}

fn default_max_page_limit() -> usize {
    80
}

/// Configuration for outbound federation delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FederationConfig {
    /// Deadline in seconds for a single outbound delivery attempt (default: 10)
    #[serde(default = "default_delivery_timeout")]
    pub delivery_timeout_secs: u64,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            delivery_timeout_secs: 10,
        }
    }
}

fn default_delivery_timeout() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            config: "./fedra.toml".to_string(),
            json_logs: false,
            generate_config: false,
            data_dir: "./data".to_string(),
            base_url: "http://localhost:3000".to_string(),
            api: None,
            federation: None,
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (FEDRA_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("FEDRA_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# Fedra Federation Server Configuration
# Place this file at ./fedra.toml or specify with --config <path>
# All settings can be overridden via environment variables (FEDRA_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 3000)
# port = 3000

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# Data directory for SQLite database and JWT signing key
# data_dir = "./data"

# Public base URL used in pagination Link headers and actor URIs
# base_url = "http://localhost:3000"

# ---- Listing API ----
# [api]

# Page size when a listing request carries no limit parameter (default: 40)
# default_page_limit = 40

# Hard ceiling on requested page sizes (default: 80)
# max_page_limit = 80

# ---- Federation Delivery ----
# [federation]

# Deadline in seconds for a single outbound delivery attempt (default: 10)
# A block that outlives this deadline still stands locally; only the
# remote notification is lost.
# delivery_timeout_secs = 10
"#
    .to_string()
}
