use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use anyhow::Context;
use charge_planner_data_management::DatabaseLocation;

pub const DEFAULT_BIND_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8001);
pub const DEFAULT_LOG_DIR: &str = "server/log";

/// Server settings, read from the environment (and `.env` if present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub database: DatabaseLocation,
    /// Empty means any origin
    pub cors_origins: Vec<String>,
    pub log_dir: PathBuf,
    /// Static frontend served for every path outside `/api`
    pub frontend_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_address = lookup("BIND_ADDRESS")
            .map(|address| address.parse::<SocketAddr>())
            .transpose()
            .context("BIND_ADDRESS is not a socket address")?
            .unwrap_or(DEFAULT_BIND_ADDRESS);

        let database = lookup("DATABASE_PATH")
            .map(|path| DatabaseLocation::File(path.into()))
            .unwrap_or_default();

        Ok(Self {
            bind_address,
            database,
            cors_origins: parse_origins(lookup("CORS_ORIGINS").as_deref().unwrap_or("*")),
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_owned()).into(),
            frontend_dir: lookup("FRONTEND_DIR").map(PathBuf::from),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            database: DatabaseLocation::default(),
            cors_origins: Vec::new(),
            log_dir: DEFAULT_LOG_DIR.into(),
            frontend_dir: None,
        }
    }
}

fn parse_origins(value: &str) -> Vec<String> {
    let origins: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        Vec::new()
    } else {
        origins
    }
}

#[test]
fn test_defaults() {
    let config = ServerConfig::from_lookup(|_| None).unwrap();
    assert_eq!(config.bind_address.port(), 8001);
    assert!(config.cors_origins.is_empty());
    assert_eq!(config.log_dir, PathBuf::from(DEFAULT_LOG_DIR));
    assert!(config.frontend_dir.is_none());
    assert!(matches!(config.database, DatabaseLocation::File(_)));
}

#[test]
fn test_default_matches_empty_environment() {
    let from_env = ServerConfig::from_lookup(|_| None).unwrap();
    let default = ServerConfig::default();
    assert_eq!(default.bind_address, from_env.bind_address);
    assert_eq!(default.bind_address, "0.0.0.0:8001".parse().unwrap());
    assert_eq!(default.cors_origins, from_env.cors_origins);
    assert_eq!(default.log_dir, from_env.log_dir);
}

#[test]
fn test_overrides() {
    let config = ServerConfig::from_lookup(|key| match key {
        "BIND_ADDRESS" => Some("127.0.0.1:9000".into()),
        "DATABASE_PATH" => Some("/tmp/planner.db".into()),
        "CORS_ORIGINS" => Some("https://a.example, https://b.example,".into()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.bind_address, "127.0.0.1:9000".parse().unwrap());
    assert_eq!(config.database, DatabaseLocation::File("/tmp/planner.db".into()));
    assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
}

#[test]
fn test_bad_bind_address() {
    assert!(ServerConfig::from_lookup(|key| (key == "BIND_ADDRESS").then(|| "not an address".to_owned())).is_err());
}
