// Gastoscan - Receipt Expense Engine Core Library
// Exposes all modules for use in the CLI and tests

pub mod aggregate;
pub mod dictionary;
pub mod error;
pub mod extraction;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod snapshot;
pub mod sqlite;
pub mod store;
pub mod timewindow;
pub mod trend;
pub mod yearly;

// Re-export commonly used types
pub use aggregate::{
    aggregate_by_category, selection_total, total_spent, AliasTotal, CategoryBreakdown,
    DEFAULT_TOP_ITEMS,
};
pub use dictionary::{edit_patch, resolve_alias, resolve_category, unique_aliases};
pub use error::{EngineError, Result};
pub use extraction::{
    parse_response, prompt_hint, ExtractedItem, ExtractedTicket, ExtractionRequest,
    ExtractionService,
};
pub use model::{
    canonical_category, Dictionary, DictionaryEntry, LineItem, Ticket, AMOUNT_TOLERANCE,
    CATEGORIES, DEFAULT_STORE, MONTHS, OTHER_CATEGORY,
};
pub use normalizer::{normalize, NormalizedScan};
pub use pipeline::{DashboardSummary, Engine, ImportSummary};
pub use snapshot::{decode, encode, export_snapshot, Snapshot, SCHEMA_ID};
pub use sqlite::SqliteStore;
pub use store::{DictionaryStore, MemoryStore, RecordStore};
pub use timewindow::{available_years, filter_tickets, history_order, TimeWindow};
pub use trend::{price_trend, Purchase, TrendPoint};
pub use yearly::{yearly_analysis, YearlyAliasRow, YearlyAnalysis, YearlyRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
