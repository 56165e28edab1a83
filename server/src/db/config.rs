use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use teamgate_misc::config::{expandenv, CommonConfig, PathSet};

use super::sqlite::Sqlite;
use super::{Database, UnionConnection};

/// Database configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DbConfig {
    /// Database type to use
    #[serde(default = "DbConfig::default_name")]
    pub name: DbType,

    /// Path of the sqlite database file. Defaults to `server.db` under
    /// the data directory. Environment variables are expanded.
    #[serde(default)]
    pub path: String,

    #[serde(skip)]
    db_path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub enum DbType {
    #[serde(rename = "sqlite")]
    Sqlite,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            path: String::new(),
            db_path: PathBuf::new(),
        }
    }
}

impl CommonConfig for DbConfig {
    fn complete(&mut self, ps: &PathSet) -> Result<()> {
        if self.path.is_empty() {
            self.db_path = ps.data_path.join("server.db");
        } else {
            let path = expandenv("db.path", &self.path).context("expand db path")?;
            self.db_path = PathBuf::from(path);
        }
        Ok(())
    }
}

impl DbConfig {
    pub fn build(&self) -> Result<Database> {
        let conn = match self.name {
            DbType::Sqlite => {
                let sqlite = Sqlite::open(&self.db_path)
                    .with_context(|| format!("open sqlite db: {}", self.db_path.display()))?;
                UnionConnection::Sqlite(sqlite)
            }
        };
        Ok(Database::new(conn))
    }

    fn default_name() -> DbType {
        DbType::Sqlite
    }
}
