// 📷 Extraction Service contract - black-box receipt reader
//
// The service takes a receipt image plus a prompt hint (the category
// enumeration) and returns a best-effort structured guess: store name and
// a list of extracted items with suggested alias/category. Nothing about
// the response is guaranteed — field presence and numeric validity are
// both defended downstream by the normalizer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{EngineError, Result};
use crate::model::CATEGORIES;

// ============================================================================
// REQUEST
// ============================================================================

/// One scan request: the raw image bytes and the category enumeration the
/// service should restrict its suggestions to.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub image: Vec<u8>,
    pub prompt_hint: Vec<String>,
}

impl ExtractionRequest {
    pub fn new(image: Vec<u8>) -> Self {
        ExtractionRequest {
            image,
            prompt_hint: prompt_hint(),
        }
    }
}

/// Category enumeration passed to the service as its prompt hint.
pub fn prompt_hint() -> Vec<String> {
    CATEGORIES.iter().map(|c| c.to_string()).collect()
}

// ============================================================================
// RESPONSE SHAPE
// ============================================================================

/// One extracted item, exactly as the service reports it.
///
/// `quantity` and `unit_price` are kept as raw JSON values: services
/// routinely return numbers as strings, nulls, or omit them entirely.
/// Coercion to non-negative reals happens in the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedItem {
    pub original_name: String,

    #[serde(default)]
    pub quantity: Value,

    #[serde(default)]
    pub unit_price: Value,

    #[serde(default)]
    pub suggested_alias: Option<String>,

    #[serde(default)]
    pub suggested_category: Option<String>,
}

/// The full extraction response. `items` is required: a response without
/// it cannot be turned into a ticket and fails the whole scan. `store` is
/// optional and defaults downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedTicket {
    #[serde(default)]
    pub store: Option<String>,

    pub items: Vec<ExtractedItem>,
}

/// Parse the service's JSON payload into the expected shape.
///
/// A missing `items` array, or anything else that breaks the shape, is an
/// `ExtractionFormat` error — terminal for this scan attempt, distinct
/// from a transport failure.
pub fn parse_response(text: &str) -> Result<ExtractedTicket> {
    serde_json::from_str(text).map_err(|e| EngineError::ExtractionFormat(e.to_string()))
}

// ============================================================================
// SERVICE TRAIT
// ============================================================================

/// The external extraction collaborator. Implementations own transport
/// concerns entirely; a failed call surfaces as
/// `EngineError::ExtractionService`.
#[async_trait]
pub trait ExtractionService: Send + Sync {
    async fn extract(&self, request: ExtractionRequest) -> Result<ExtractedTicket>;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let text = r#"{
            "store": "Mercado Central",
            "items": [
                {
                    "originalName": "LECHE ENT 1L",
                    "quantity": 2,
                    "unitPrice": 1.5,
                    "lineTotal": 3.0,
                    "suggestedAlias": "Milk",
                    "suggestedCategory": "Dairy"
                }
            ]
        }"#;

        let extracted = parse_response(text).unwrap();
        assert_eq!(extracted.store.as_deref(), Some("Mercado Central"));
        assert_eq!(extracted.items.len(), 1);
        assert_eq!(extracted.items[0].original_name, "LECHE ENT 1L");
        assert_eq!(extracted.items[0].suggested_alias.as_deref(), Some("Milk"));
    }

    #[test]
    fn test_parse_tolerates_missing_optional_fields() {
        // No store, stringly-typed quantity, no suggestions at all.
        let text = r#"{
            "items": [
                { "originalName": "PAN BARRA", "quantity": "1", "unitPrice": "0.80" }
            ]
        }"#;

        let extracted = parse_response(text).unwrap();
        assert!(extracted.store.is_none());
        assert_eq!(extracted.items[0].quantity, Value::String("1".to_string()));
        assert!(extracted.items[0].suggested_category.is_none());
    }

    #[test]
    fn test_parse_rejects_missing_items() {
        let err = parse_response(r#"{ "store": "Market" }"#).unwrap_err();
        assert!(matches!(err, EngineError::ExtractionFormat(_)));

        let err = parse_response("not json at all").unwrap_err();
        assert!(matches!(err, EngineError::ExtractionFormat(_)));
    }

    #[test]
    fn test_parse_empty_items_is_a_valid_ticket() {
        let extracted = parse_response(r#"{ "items": [] }"#).unwrap();
        assert!(extracted.items.is_empty());
    }

    #[test]
    fn test_prompt_hint_carries_the_closed_category_set() {
        let hint = ExtractionRequest::new(vec![0xFF, 0xD8]).prompt_hint;
        assert_eq!(hint.len(), CATEGORIES.len());
        assert!(hint.iter().any(|c| c == "Other"));
    }
}
