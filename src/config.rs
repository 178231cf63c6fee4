use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::auth::DEFAULT_LOGIN_ROUTE;
use crate::middleware::PublicEndpoints;

/// Job portal API client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Base URL of the portal API
    #[arg(
        short = 'u',
        long,
        env = "API_URL",
        default_value = "http://localhost:8080/api",
        global = true
    )]
    pub api_url: String,

    /// Path to the SQLite file holding the session
    #[arg(short = 'd', long, env = "JOBPORTAL_CREDENTIALS_DB", global = true)]
    pub credentials_db: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// HTTP connect timeout in seconds
    #[arg(long, env = "HTTP_CONNECT_TIMEOUT", default_value = "10", global = true)]
    pub http_connect_timeout: u64,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_REQUEST_TIMEOUT", default_value = "30", global = true)]
    pub http_request_timeout: u64,

    /// Comma-separated URL fragments that never get a bearer token
    #[arg(long, env = "PUBLIC_API_PATHS", default_value = "/auth/,/public/", global = true)]
    pub public_paths: String,

    /// Route shown after the session is terminated
    #[arg(long, env = "LOGIN_ROUTE", default_value = DEFAULT_LOGIN_ROUTE, global = true)]
    pub login_route: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account (does not log in)
    Register {
        #[arg(long, value_enum)]
        role: AccountKind,

        #[arg(long)]
        full_name: String,

        #[arg(short, long)]
        email: String,

        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,

        /// Required for employer accounts
        #[arg(long)]
        company_name: Option<String>,
    },

    /// End the session locally and on the backend
    Logout,

    /// Show the stored user
    Whoami,

    /// Send an authenticated request and print the JSON response
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE)
        method: String,

        /// Path relative to the API URL, e.g. /jobs
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum AccountKind {
    JobSeeker,
    Employer,
}

#[derive(Clone, Debug)]
pub struct Config {
    // Backend
    pub api_url: String,

    // Session storage
    pub credentials_db: PathBuf,

    // HTTP client
    pub http_connect_timeout: u64,
    pub http_request_timeout: u64,

    // Auth pipeline
    pub public_endpoints: PublicEndpoints,
    pub login_route: String,

    // Logging
    pub log_level: String,
}

impl Config {
    /// Load configuration with priority: CLI > ENV > defaults
    pub fn load() -> Result<(Self, Command)> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let args = CliArgs::parse();
        let command = args.command.clone();
        Ok((Self::from_args(args)?, command))
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let credentials_db = match args.credentials_db {
            Some(path) => expand_tilde(&path),
            None => default_credentials_db()
                .context("No data directory found (set JOBPORTAL_CREDENTIALS_DB)")?,
        };

        Ok(Config {
            api_url: args.api_url.trim_end_matches('/').to_string(),
            credentials_db,
            http_connect_timeout: args.http_connect_timeout,
            http_request_timeout: args.http_request_timeout,
            public_endpoints: PublicEndpoints::parse(&args.public_paths),
            login_route: args.login_route,
            log_level: args.log_level,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api_url)
            .with_context(|| format!("API_URL is not a valid URL: {}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("API_URL must use http or https: {}", self.api_url);
        }

        if self.http_connect_timeout == 0 || self.http_request_timeout == 0 {
            anyhow::bail!("HTTP timeouts must be greater than zero");
        }

        if self.login_route.is_empty() {
            anyhow::bail!("LOGIN_ROUTE cannot be empty");
        }

        Ok(())
    }
}

/// Expand tilde (~) in file paths to user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn default_credentials_db() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("jobportal").join("credentials.sqlite3"))
}
