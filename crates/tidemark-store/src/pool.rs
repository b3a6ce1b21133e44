//! Connection handling for the store's single database file.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use ::duckdb::Connection;

/// Shares a bounded set of connections to one `DuckDB` file.
///
/// The store's workload is a handful of interactive statements over two
/// small tables, so every handle is read-write and there is one idle
/// list. `capacity` bounds how many connections are kept around after
/// use, not how many can be open at once.
#[derive(Clone)]
pub struct ConnectionPool {
    shared: Arc<Shared>,
}

struct Shared {
    db_path: PathBuf,
    capacity: usize,
    idle: Mutex<Vec<Connection>>,
}

impl ConnectionPool {
    #[must_use]
    pub fn new(db_path: impl Into<PathBuf>, capacity: usize) -> Self {
        Self {
            shared: Arc::new(Shared {
                db_path: db_path.into(),
                capacity: capacity.max(1),
                idle: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Take an idle connection, or open and configure a fresh one.
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened.
    ///
    /// # Panics
    /// Panics if the idle-list mutex is poisoned.
    pub fn checkout(&self) -> Result<StoreConnection, ::duckdb::Error> {
        let reused = self
            .shared
            .idle
            .lock()
            .expect("store connection mutex poisoned")
            .pop();

        let connection = match reused {
            Some(connection) => connection,
            None => {
                let connection = Connection::open(self.shared.db_path.as_path())?;
                connection.execute_batch("PRAGMA disable_progress_bar;")?;
                connection
            }
        };

        Ok(StoreConnection {
            shared: Arc::clone(&self.shared),
            connection: Some(connection),
        })
    }

    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.shared.db_path.as_path()
    }
}

/// A checked-out connection; goes back on the idle list when dropped.
pub struct StoreConnection {
    shared: Arc<Shared>,
    connection: Option<Connection>,
}

impl Deref for StoreConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("store connection already returned")
    }
}

impl DerefMut for StoreConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("store connection already returned")
    }
}

impl Drop for StoreConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let mut idle = self
            .shared
            .idle
            .lock()
            .expect("store connection mutex poisoned");
        if idle.len() < self.shared.capacity {
            idle.push(connection);
        }
    }
}
