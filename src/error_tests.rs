//! Tests for error types

#[cfg(test)]
mod tests {
    use super::super::error::EngineError;

    #[test]
    fn test_invalid_date_display() {
        let err = EngineError::InvalidDate("07/04/2025".to_string());
        assert!(err.to_string().contains("07/04/2025"));
        assert!(err.to_string().contains("ISO 8601"));
    }

    #[test]
    fn test_invalid_range_display() {
        let err = EngineError::InvalidDateRange {
            from: "2025-07-10".to_string(),
            to: "2025-07-01".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2025-07-10"));
        assert!(msg.contains("2025-07-01"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io(_)));
    }

    #[test]
    fn test_json_error_converts() {
        let bad: Result<serde_json::Value, _> = serde_json::from_str("{nope");
        let err: EngineError = bad.unwrap_err().into();
        assert!(matches!(err, EngineError::Json(_)));
    }
}
