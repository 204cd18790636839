//! Redis-backed store
//!
//! One synchronous connection guarded by a mutex. Every call is a single
//! round trip with connect/read/write bounded by the configured timeout;
//! failures surface as [`NotesError::StoreUnavailable`] and are not retried.
//! A connection that hit an I/O error or a timeout is dropped and the next
//! call opens a fresh one.

use crate::error::{NotesError, Result};
use crate::infrastructure::store::KeyValueStore;
use redis::{Commands, ConnectionLike};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct RedisStore {
    client: redis::Client,
    timeout: Duration,
    // None once the connection is known to be broken
    connection: Mutex<Option<redis::Connection>>,
}

impl RedisStore {
    /// Open a connection to `url` (e.g. `redis://localhost:6379`)
    pub fn connect(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| NotesError::Config(format!("Invalid Redis URL: {}", e)))?;

        let connection = open_connection(&client, timeout)?;

        info!(
            "Connected to Redis (timeout: {}s, URL: {})",
            timeout.as_secs(),
            redact_url(url)
        );

        Ok(RedisStore {
            client,
            timeout,
            connection: Mutex::new(Some(connection)),
        })
    }

    fn slot(&self) -> Result<MutexGuard<'_, Option<redis::Connection>>> {
        self.connection
            .lock()
            .map_err(|_| NotesError::StoreUnavailable("Redis connection lock poisoned".to_string()))
    }

    /// Run one command, reopening the connection first if the last one broke
    fn run<T>(
        &self,
        f: impl FnOnce(&mut redis::Connection) -> redis::RedisResult<T>,
    ) -> Result<T> {
        let mut slot = self.slot()?;

        let conn = match slot.take() {
            Some(conn) if conn.is_open() => slot.insert(conn),
            _ => {
                debug!("Opening a new Redis connection");
                slot.insert(open_connection(&self.client, self.timeout)?)
            }
        };

        match f(conn) {
            Ok(value) => Ok(value),
            Err(e) => {
                // A timed-out reply may still arrive on this stream
                if e.is_io_error() || e.is_timeout() || e.is_connection_dropped() {
                    warn!("Dropping Redis connection after error: {}", e);
                    *slot = None;
                }
                Err(e.into())
            }
        }
    }
}

fn open_connection(client: &redis::Client, timeout: Duration) -> Result<redis::Connection> {
    let connection = client.get_connection_with_timeout(timeout)?;
    connection.set_read_timeout(Some(timeout))?;
    connection.set_write_timeout(Some(timeout))?;
    Ok(connection)
}

/// Hide credentials before a URL goes into a log line
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

impl KeyValueStore for RedisStore {
    fn set(&self, key: &str, value: &str) -> Result<()> {
        debug!("Redis SET {}", key);
        self.run(|conn| conn.set::<_, _, ()>(key, value))
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        debug!("Redis GET {}", key);
        self.run(|conn| conn.get::<_, Option<String>>(key))
    }

    fn delete(&self, key: &str) -> Result<()> {
        debug!("Redis DEL {}", key);
        self.run(|conn| conn.del::<_, ()>(key))
    }

    fn add_to_set(&self, key: &str, member: &str) -> Result<()> {
        debug!("Redis SADD {} {}", key, member);
        self.run(|conn| conn.sadd::<_, _, ()>(key, member))
    }

    fn remove_from_set(&self, key: &str, member: &str) -> Result<()> {
        debug!("Redis SREM {} {}", key, member);
        self.run(|conn| conn.srem::<_, _, ()>(key, member))
    }

    fn members_of(&self, key: &str) -> Result<BTreeSet<String>> {
        debug!("Redis SMEMBERS {}", key);
        self.run(|conn| conn.smembers::<_, BTreeSet<String>>(key))
    }

    fn multi_get(&self, keys: &[String]) -> Result<Vec<Option<String>>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Redis MGET ({} keys)", keys.len());
        self.run(|conn| redis::cmd("MGET").arg(keys).query::<Vec<Option<String>>>(conn))
    }
}
