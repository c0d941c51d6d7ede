// Error taxonomy for the expense engine.
//
// Four terminal kinds, all surfaced to the caller as non-fatal
// notifications: upstream extraction failures (retryable by the caller),
// malformed extraction responses, malformed snapshot files, and store
// write failures. Per-field numeric problems inside a line item are
// recovered locally by the normalizer and never reach this enum.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The extraction call itself failed (network, quota, transport).
    /// Retryable by the caller; never retried internally.
    #[error("extraction service failure: {0}")]
    ExtractionService(String),

    /// The extraction response could not be read as the expected shape.
    /// Not retryable; the whole scan attempt is rejected.
    #[error("could not read this receipt: {0}")]
    ExtractionFormat(String),

    /// A snapshot file is missing required structure. The import is
    /// aborted with no partial state.
    #[error("invalid snapshot: {0}")]
    SnapshotFormat(String),

    /// A store write failed. Fatal for the current operation; already
    /// committed writes are not rolled back.
    #[error("store write failed: {0}")]
    StoreWrite(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        let err = EngineError::SnapshotFormat("missing `dictionary` key".to_string());
        assert!(err.to_string().contains("snapshot"));
        assert!(err.to_string().contains("dictionary"));

        let err = EngineError::ExtractionFormat("no `items` array".to_string());
        assert!(err.to_string().contains("receipt"));
    }
}
