use crate::models::Session;
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use std::sync::Mutex;

const SESSION_KEY: &str = "user";

/// Persisted "who is logged in" record shared by every page.
///
/// `load` never fails: a missing, unreadable or malformed record reads as
/// logged out.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

fn decode(raw: &str) -> Option<Session> {
    match serde_json::from_str::<Session>(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("ignoring malformed session record: {}", e);
            None
        }
    }
}

/// Single-key SQLite table standing in for browser local storage.
pub struct SqliteSessionStore {
    conn: Mutex<Connection>,
}

impl SqliteSessionStore {
    pub fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteSessionStore {
            conn: Mutex::new(conn),
        })
    }

    fn read_raw(&self) -> Result<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                [SESSION_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write_raw(&self, value: &str) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (SESSION_KEY, value),
        )?;
        Ok(())
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> Option<Session> {
        match self.read_raw() {
            Ok(Some(raw)) => decode(&raw),
            Ok(None) => None,
            Err(e) => {
                log::warn!("failed to read session record: {}", e);
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.write_raw(&serde_json::to_string(session)?)?;
        log::info!("session saved for {}", session.email);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", [SESSION_KEY])?;
        log::info!("session cleared");
        Ok(())
    }
}

/// Non-persistent store; keeps the serialized record like the SQLite one.
#[derive(Default)]
pub struct MemorySessionStore {
    raw: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        if let Ok(mut raw) = store.raw.lock() {
            *raw = serde_json::to_string(session).ok();
        }
        store
    }

    pub fn with_raw(raw: &str) -> Self {
        MemorySessionStore {
            raw: Mutex::new(Some(raw.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        let raw = self.raw.lock().ok()?;
        raw.as_deref().and_then(decode)
    }

    fn save(&self, session: &Session) -> Result<()> {
        let encoded = serde_json::to_string(session)?;
        let mut raw = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        *raw = Some(encoded);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut raw = self
            .raw
            .lock()
            .map_err(|_| anyhow::anyhow!("session store lock poisoned"))?;
        *raw = None;
        Ok(())
    }
}
