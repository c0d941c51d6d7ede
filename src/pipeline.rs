// 🔁 Pipeline - scan, edit, delete, export, import
//
// One struct ties the three external collaborators together and owns
// every flow that crosses an I/O boundary. The aggregators stay pure:
// callers read a (tickets, dictionary) snapshot pair and recompute views
// from it; nothing here caches derived state.

use chrono::{DateTime, FixedOffset, Local};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::aggregate::{aggregate_by_category, total_spent};
use crate::dictionary::{edit_patch, unique_aliases};
use crate::error::Result;
use crate::extraction::{ExtractionRequest, ExtractionService};
use crate::model::{Dictionary, DictionaryEntry, Ticket};
use crate::normalizer::normalize;
use crate::snapshot::{decode, export_snapshot, Snapshot};
use crate::store::{DictionaryStore, RecordStore};

// ============================================================================
// ENGINE
// ============================================================================

pub struct Engine {
    extraction: Arc<dyn ExtractionService>,
    records: Arc<dyn RecordStore>,
    dictionary: Arc<dyn DictionaryStore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub tickets: usize,
    pub entries: usize,
}

/// The dashboard headline numbers.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub total_spent: f64,
    pub ticket_count: usize,
    pub unique_items: usize,
    pub categories_used: usize,
}

impl Engine {
    pub fn new(
        extraction: Arc<dyn ExtractionService>,
        records: Arc<dyn RecordStore>,
        dictionary: Arc<dyn DictionaryStore>,
    ) -> Self {
        Engine {
            extraction,
            records,
            dictionary,
        }
    }

    /// Full scan flow: extract, normalize against the current dictionary
    /// snapshot, then write — new dictionary entries first (additive
    /// only), then the ticket. No write happens before normalization
    /// fully succeeds, so a cancelled or failed scan leaves both stores
    /// untouched.
    pub async fn scan(&self, request: ExtractionRequest) -> Result<Ticket> {
        self.scan_at(request, Local::now().fixed_offset()).await
    }

    /// Same flow with an explicit ingestion timestamp.
    pub async fn scan_at(
        &self,
        request: ExtractionRequest,
        scanned_at: DateTime<FixedOffset>,
    ) -> Result<Ticket> {
        let extracted = self.extraction.extract(request).await?;
        let snapshot = self.dictionary.read_all().await?;
        let scan = normalize(&extracted, &snapshot, scanned_at);

        if scan.has_new_entries() {
            info!(entries = scan.new_entries.len(), "staging new dictionary entries");
            self.dictionary.merge_write(scan.new_entries.clone()).await?;
        }

        let mut ticket = scan.ticket;
        ticket.id = self.records.create(ticket.clone()).await?;
        info!(id = %ticket.id, store = %ticket.store, total = ticket.total, "ticket ingested");
        Ok(ticket)
    }

    /// Unconditional, irreversible ticket deletion.
    pub async fn delete_ticket(&self, id: &str) -> Result<()> {
        self.records.delete(id).await?;
        info!(id, "ticket deleted");
        Ok(())
    }

    /// Reassign alias/category for one raw name. The patch touches only
    /// that key; this is the one path that may overwrite an existing
    /// entry outside of import.
    pub async fn edit_entry(&self, name: &str, entry: DictionaryEntry) -> Result<()> {
        self.dictionary.merge_write(edit_patch(name, entry)).await
    }

    /// Current state pair, read fresh from the stores.
    pub async fn state(&self) -> Result<(Vec<Ticket>, Dictionary)> {
        let tickets = self.records.read_all().await?;
        let dictionary = self.dictionary.read_all().await?;
        Ok((tickets, dictionary))
    }

    pub async fn export(&self) -> Result<Snapshot> {
        let (tickets, dictionary) = self.state().await?;
        Ok(export_snapshot(&tickets, &dictionary))
    }

    /// Import a portable snapshot document.
    ///
    /// Validation happens before any write. Then two phases: one batched
    /// authoritative dictionary merge (imported entries overwrite
    /// same-key existing ones), then the atomic ticket batch. A failure
    /// between the phases leaves the dictionary updated with no tickets
    /// imported — an accepted gap, surfaced in the logs rather than
    /// silently masked.
    pub async fn import_document(&self, text: &str) -> Result<ImportSummary> {
        let snapshot = decode(text)?;
        let summary = ImportSummary {
            tickets: snapshot.tickets.len(),
            entries: snapshot.dictionary.len(),
        };

        self.dictionary.merge_write(snapshot.dictionary).await?;
        if let Err(e) = self.records.upsert_batch(snapshot.tickets).await {
            warn!(error = %e, "ticket batch failed after dictionary merge; dictionary keeps the imported entries");
            return Err(e);
        }

        info!(tickets = summary.tickets, entries = summary.entries, "snapshot imported");
        Ok(summary)
    }

    /// Dashboard rollups, recomputed from a fresh snapshot pair.
    pub async fn summary(&self) -> Result<DashboardSummary> {
        let (tickets, dictionary) = self.state().await?;
        let refs: Vec<&Ticket> = tickets.iter().collect();
        Ok(DashboardSummary {
            total_spent: total_spent(&tickets),
            ticket_count: tickets.len(),
            unique_items: unique_aliases(&dictionary).len(),
            categories_used: aggregate_by_category(&refs, &dictionary).len(),
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================
