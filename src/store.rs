// 🗄️ Store contracts - the external persistence collaborators
//
// The engine owns no durable state: tickets live in a record store and
// the name→alias/category dictionary in a dictionary store, both behind
// async traits. Reads hand back full snapshots the caller must treat as
// immutable; every mutation is a new write followed by a fresh read.
// `MemoryStore` implements both contracts for tests and ephemeral runs.

use async_trait::async_trait;
use std::sync::RwLock;

use crate::error::Result;
use crate::model::{Dictionary, Ticket};

// ============================================================================
// CONTRACTS
// ============================================================================

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a ticket. When the ticket carries no id the store assigns
    /// one; the assigned id is returned and stays stable for the life of
    /// the record.
    async fn create(&self, ticket: Ticket) -> Result<String>;

    /// Unconditional, irreversible removal. Deleting an unknown id is a
    /// no-op.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Full collection read, unordered. Display/trend ordering is the
    /// engine's concern.
    async fn read_all(&self) -> Result<Vec<Ticket>>;

    /// Atomic upsert-by-id batch for snapshot imports: same-id tickets
    /// are overwritten, tickets without ids get fresh ones (and would
    /// duplicate on re-import). The batch fully succeeds or fails as a
    /// whole.
    async fn upsert_batch(&self, tickets: Vec<Ticket>) -> Result<()>;
}

#[async_trait]
pub trait DictionaryStore: Send + Sync {
    /// Full dictionary snapshot.
    async fn read_all(&self) -> Result<Dictionary>;

    /// Merge the patch into the stored mapping, per key, never replacing
    /// the whole document. Last write wins per key: two near-simultaneous
    /// scans staging the same brand-new name converge rather than
    /// serialize — an accepted eventual-consistency gap.
    async fn merge_write(&self, patch: Dictionary) -> Result<()>;
}

// ============================================================================
// IN-MEMORY STORE
// ============================================================================

/// Both stores in one process-local struct. Lock discipline mirrors the
/// real collaborators' guarantees: whole-collection reads, per-key merge
/// writes, batch applied under a single write lock.
#[derive(Default)]
pub struct MemoryStore {
    tickets: RwLock<Vec<Ticket>>,
    dictionary: RwLock<Dictionary>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create(&self, mut ticket: Ticket) -> Result<String> {
        if !ticket.has_id() {
            ticket.id = uuid::Uuid::new_v4().to_string();
        }
        let id = ticket.id.clone();

        let mut tickets = self.tickets.write().unwrap();
        match tickets.iter_mut().find(|t| t.id == id) {
            Some(existing) => *existing = ticket,
            None => tickets.push(ticket),
        }
        Ok(id)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.tickets.write().unwrap().retain(|t| t.id != id);
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<Ticket>> {
        Ok(self.tickets.read().unwrap().clone())
    }

    async fn upsert_batch(&self, batch: Vec<Ticket>) -> Result<()> {
        let mut tickets = self.tickets.write().unwrap();
        for mut ticket in batch {
            if !ticket.has_id() {
                ticket.id = uuid::Uuid::new_v4().to_string();
            }
            match tickets.iter_mut().find(|t| t.id == ticket.id) {
                Some(existing) => *existing = ticket,
                None => tickets.push(ticket),
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DictionaryStore for MemoryStore {
    async fn read_all(&self) -> Result<Dictionary> {
        Ok(self.dictionary.read().unwrap().clone())
    }

    async fn merge_write(&self, patch: Dictionary) -> Result<()> {
        let mut dictionary = self.dictionary.write().unwrap();
        for (name, entry) in patch {
            dictionary.insert(name, entry);
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
