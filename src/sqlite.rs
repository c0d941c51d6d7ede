// SQLite-backed store - file persistence for tickets and dictionary
//
// One connection behind a mutex, WAL mode for crash recovery. Line items
// are stored as a JSON column; the dictionary is one row per raw name so
// merge writes stay per-key. Import batches run inside a single SQLite
// transaction, which is what makes the snapshot ticket batch atomic.

use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::model::{Dictionary, DictionaryEntry, LineItem, Ticket};
use crate::store::{DictionaryStore, RecordStore};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and run the schema setup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(store_err)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(store_err)?;
        setup_schema(&conn).map_err(store_err)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }

    /// Ephemeral database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(store_err)?;
        setup_schema(&conn).map_err(store_err)?;
        Ok(SqliteStore {
            conn: Mutex::new(conn),
        })
    }
}

fn setup_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tickets (
            id TEXT PRIMARY KEY,
            date TEXT NOT NULL,
            store TEXT NOT NULL,
            items TEXT NOT NULL,
            total REAL NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS dictionary (
            name TEXT PRIMARY KEY,
            alias TEXT NOT NULL,
            category TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute("CREATE INDEX IF NOT EXISTS idx_tickets_date ON tickets(date)", [])?;

    Ok(())
}

fn store_err(e: impl std::fmt::Display) -> EngineError {
    EngineError::StoreWrite(e.to_string())
}

fn upsert_ticket(conn: &Connection, ticket: &Ticket) -> Result<()> {
    let items_json = serde_json::to_string(&ticket.items).map_err(store_err)?;
    conn.execute(
        "INSERT INTO tickets (id, date, store, items, total)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            date = excluded.date,
            store = excluded.store,
            items = excluded.items,
            total = excluded.total",
        params![
            ticket.id,
            ticket.date.to_rfc3339(),
            ticket.store,
            items_json,
            ticket.total,
        ],
    )
    .map_err(store_err)?;
    Ok(())
}

fn ticket_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, String, String, f64)> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn create(&self, mut ticket: Ticket) -> Result<String> {
        if !ticket.has_id() {
            ticket.id = uuid::Uuid::new_v4().to_string();
        }
        let conn = self.conn.lock().unwrap();
        upsert_ticket(&conn, &ticket)?;
        debug!(id = %ticket.id, store = %ticket.store, "ticket stored");
        Ok(ticket.id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM tickets WHERE id = ?1", params![id])
            .map_err(store_err)?;
        debug!(id, "ticket deleted");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Ticket>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, date, store, items, total FROM tickets")
            .map_err(store_err)?;
        let rows = stmt.query_map([], ticket_from_row).map_err(store_err)?;

        let mut tickets = Vec::new();
        for row in rows {
            let (id, date, store, items_json, total) = row.map_err(store_err)?;
            let date = chrono::DateTime::parse_from_rfc3339(&date).map_err(store_err)?;
            let items: Vec<LineItem> = serde_json::from_str(&items_json).map_err(store_err)?;
            tickets.push(Ticket { id, date, store, items, total });
        }
        Ok(tickets)
    }

    async fn upsert_batch(&self, batch: Vec<Ticket>) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(store_err)?;
        for mut ticket in batch {
            if !ticket.has_id() {
                ticket.id = uuid::Uuid::new_v4().to_string();
            }
            upsert_ticket(&tx, &ticket)?;
        }
        tx.commit().map_err(store_err)?;
        Ok(())
    }
}

#[async_trait]
impl DictionaryStore for SqliteStore {
    async fn read_all(&self) -> Result<Dictionary> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT name, alias, category FROM dictionary")
            .map_err(store_err)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(store_err)?;

        let mut dictionary = Dictionary::new();
        for row in rows {
            let (name, alias, category) = row.map_err(store_err)?;
            dictionary.insert(name, DictionaryEntry { alias, category });
        }
        Ok(dictionary)
    }

    async fn merge_write(&self, patch: Dictionary) -> Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(store_err)?;
        for (name, entry) in &patch {
            tx.execute(
                "INSERT INTO dictionary (name, alias, category)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET
                    alias = excluded.alias,
                    category = excluded.category",
                params![name, entry.alias, entry.category],
            )
            .map_err(store_err)?;
        }
        tx.commit().map_err(store_err)?;
        debug!(entries = patch.len(), "dictionary merge applied");
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
