use std::path::PathBuf;

use charge_planner_lib::trip::ValidationError;
use const_format::concatcp;
use thiserror::Error;

pub mod database;
mod data_manager;
pub mod seed;

pub use data_manager::*;

pub const DATA_DIR: &str = "data/";
pub const DATABASE_PATH: &str = concatcp!(DATA_DIR, "database.db");

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

impl DatabaseLocation {
    /// `data/database.db` under the project root, or under the working directory
    /// when no project root can be found.
    pub fn default_file() -> Self {
        let root = project_root::get_project_root().unwrap_or_else(|_| PathBuf::from("."));
        Self::File(root.join(DATABASE_PATH))
    }
}

impl Default for DatabaseLocation {
    fn default() -> Self {
        Self::default_file()
    }
}

#[derive(Debug, Error)]
pub enum DataManagerError {
    #[error("database error: {0}")]
    Database(String),
    #[error("{0}")]
    NotFound(String),
    #[error("encoding error: {0}")]
    Encoding(String),
    #[error("io error: {0}")]
    Io(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
