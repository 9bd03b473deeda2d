//! Backend selection at startup.
//!
//! # Responsibility
//! - Describe which `PostStore` backend a process should use.
//! - Build the selected backend behind a trait object.
//!
//! # Invariants
//! - The SQLite statement timeout is always non-zero.
//! - Environment overrides ignore blank values.

use crate::db::DEFAULT_STATEMENT_TIMEOUT;
use crate::repo::memory_store::InMemoryPostStore;
use crate::repo::post_store::{PostStore, StoreError, StoreResult};
use crate::repo::sqlite_store::SqlitePostStore;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

/// Database file used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "blog.db";
/// Env override for the backend kind (`memory|sqlite|sqlite-memory`).
pub const BACKEND_ENV: &str = "BLOG_STORE_BACKEND";
/// Env override for the SQLite database file path.
pub const DB_PATH_ENV: &str = "BLOG_STORE_DB_PATH";

/// Which backend serves the `PostStore` contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Process-local map; nothing survives a restart.
    Memory,
    /// Durable SQLite file.
    Sqlite { path: PathBuf },
    /// SQLite engine without a backing file.
    SqliteInMemory,
}

/// Startup configuration for the post store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Busy timeout applied to every SQLite statement.
    pub statement_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite {
                path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            },
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }
}

impl StoreConfig {
    /// Config backed by the in-memory map.
    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            ..Self::default()
        }
    }

    /// Config backed by the SQLite file at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::Sqlite { path: path.into() },
            ..Self::default()
        }
    }

    /// Reads `BLOG_STORE_BACKEND` and `BLOG_STORE_DB_PATH` over the defaults.
    pub fn from_env() -> StoreResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> StoreResult<Self> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let path = non_blank(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));

        let backend = match non_blank(BACKEND_ENV)
            .map(|value| value.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("sqlite") => StoreBackend::Sqlite { path },
            Some("memory") => StoreBackend::Memory,
            Some("sqlite-memory") => StoreBackend::SqliteInMemory,
            Some(other) => {
                return Err(StoreError::InvalidConfig(format!(
                    "unsupported {BACKEND_ENV} `{other}`; expected memory|sqlite|sqlite-memory"
                )));
            }
        };

        let config = Self {
            backend,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations no backend can honor.
    pub fn validate(&self) -> StoreResult<()> {
        if self.statement_timeout.is_zero() {
            return Err(StoreError::InvalidConfig(
                "statement_timeout must be greater than zero".to_string(),
            ));
        }
        if let StoreBackend::Sqlite { path } = &self.backend {
            if path.as_os_str().is_empty() {
                return Err(StoreError::InvalidConfig(
                    "sqlite path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Builds the backend selected by `config`.
///
/// # Errors
/// - `InvalidConfig` when `config` fails validation.
/// - Any construction failure of the SQLite backend; no store is returned.
pub fn open_post_store(config: &StoreConfig) -> StoreResult<Box<dyn PostStore + Send>> {
    config.validate()?;

    let store: Box<dyn PostStore + Send> = match &config.backend {
        StoreBackend::Memory => Box::new(InMemoryPostStore::new()),
        StoreBackend::Sqlite { path } => {
            let store = SqlitePostStore::open(path)?;
            store.set_statement_timeout(config.statement_timeout)?;
            Box::new(store)
        }
        StoreBackend::SqliteInMemory => {
            let store = SqlitePostStore::open_in_memory()?;
            store.set_statement_timeout(config.statement_timeout)?;
            Box::new(store)
        }
    };

    info!(
        "event=store_select module=config status=ok backend={}",
        backend_label(&config.backend)
    );
    Ok(store)
}

fn backend_label(backend: &StoreBackend) -> &'static str {
    match backend {
        StoreBackend::Memory => "memory",
        StoreBackend::Sqlite { .. } => "sqlite",
        StoreBackend::SqliteInMemory => "sqlite-memory",
    }
}
