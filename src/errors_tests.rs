//! Unit tests for error handling
//!
//! Tests error kinds, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;

    use crate::errors::ErrorKind;
    use crate::errors::FeedbackError;

    // ====== Error Kind Tests ======

    #[test]
    fn test_taxonomy_names() {
        assert_eq!(FeedbackError::EmptyIndex.kind().as_str(), "EmptyIndexError");
        assert_eq!(
            FeedbackError::IndexCorruption("3 vs 4".to_string())
                .kind()
                .to_string(),
            "IndexCorruptionError"
        );
        assert_eq!(
            FeedbackError::InvalidProfile("negative".to_string()).kind(),
            ErrorKind::InvalidProfile
        );
        assert_eq!(
            FeedbackError::CompletionError("503".to_string()).kind(),
            ErrorKind::Completion
        );
    }

    #[test]
    fn test_dimension_mismatch_is_embedding_failure() {
        let error = FeedbackError::DimensionMismatch {
            expected: 3072,
            actual: 1536,
        };
        assert_eq!(error.kind(), ErrorKind::Embedding);
        let display = error.to_string();
        assert!(display.contains("3072"));
        assert!(display.contains("1536"));
    }

    #[test]
    fn test_timeout_is_distinct_kind() {
        let error = FeedbackError::Timeout {
            operation: "completion",
            seconds: 30,
        };
        assert_eq!(error.kind(), ErrorKind::Timeout);
        assert_ne!(error.kind(), ErrorKind::Completion);
        assert_eq!(error.to_string(), "completion call timed out after 30s");
    }

    #[test]
    fn test_k_exceeds_message() {
        let error = FeedbackError::KExceedsStoreSize {
            requested: 10,
            available: 5,
        };
        assert!(error.to_string().contains("k exceeds store size"));
    }

    // ====== Raw Output Tests ======

    #[test]
    fn test_response_validation_errors_carry_raw_text() {
        let errors = [
            FeedbackError::NoJsonFound {
                raw: "just prose".to_string(),
            },
            FeedbackError::MalformedJson {
                reason: "trailing comma".to_string(),
                raw: "{\"a\":1,}".to_string(),
            },
            FeedbackError::SchemaValidation {
                reason: "missing key".to_string(),
                raw: "{}".to_string(),
            },
        ];

        for error in &errors {
            assert!(error.kind().is_response_validation());
            assert!(error.raw_output().is_some());
        }
        assert_eq!(errors[0].raw_output(), Some("just prose"));
    }

    #[test]
    fn test_other_errors_have_no_raw_text() {
        let error = FeedbackError::EmbeddingError("quota".to_string());
        assert!(error.raw_output().is_none());
        assert!(!error.kind().is_response_validation());
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: FeedbackError = io_err.into();

        assert!(matches!(err, FeedbackError::Io(_)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: Result<serde_json::Value, _> = serde_json::from_str("{invalid json}");

        if let Err(json_err) = parse_result {
            let err: FeedbackError = json_err.into();
            assert!(matches!(err, FeedbackError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_from_toml() {
        let parse_result: Result<toml::Value, _> = toml::from_str("level = ");

        if let Err(toml_err) = parse_result {
            let err: FeedbackError = toml_err.into();
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }
}
