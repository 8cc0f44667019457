use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// API root used when `API_BASE_URL` is not set.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api/v1";

/// Where the token pair is kept between runs, relative to the working directory.
pub const DEFAULT_CREDENTIALS_PATH: &str = ".catalogai/credentials.json";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// Loads variables from a `.env` file in the working directory, if present.
/// Already-set environment variables win.
pub fn load_dotenv() {
    dotenv().ok();
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Root URL of the CatalogAI API; request paths are resolved against it.
    #[arg(long, env, default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Timeout in seconds for a single backend request
    #[arg(long, env, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Timeout in seconds for the token refresh call. Requests queued behind a
    /// refresh fail together when it runs out.
    #[arg(long, env, default_value_t = 30)]
    pub refresh_timeout_secs: u64,

    /// File holding the access/refresh token pair between runs
    #[arg(long, env, default_value = DEFAULT_CREDENTIALS_PATH)]
    credentials_path: PathBuf,

    /// Hex-encoded 32-byte key. When set, stored tokens are encrypted with AES-256-GCM.
    #[arg(long, env)]
    credentials_encryption_key: Option<String>,

    /// User agent sent with every request
    #[arg(long, env)]
    user_agent: Option<String>,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Warn,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Config {
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout_secs)
    }

    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn set_credentials_path(mut self, credentials_path: PathBuf) -> Self {
        self.credentials_path = credentials_path;
        self
    }

    pub fn credentials_encryption_key(&self) -> Option<String> {
        self.credentials_encryption_key.clone()
    }

    pub fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }

    pub fn is_production(&self) -> bool {
        self.runtime_env() == RustEnv::Production
    }
}
