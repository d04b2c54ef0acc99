//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a free-text search query is non-empty after trimming and
/// short enough to forward to every provider.
pub fn validate_query(query: &str) -> Result<(), ValidationError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        let mut err = ValidationError::new("query_empty");
        err.message = Some("Query must not be empty".into());
        return Err(err);
    }

    if trimmed.len() > 256 {
        let mut err = ValidationError::new("query_too_long");
        err.message = Some(format!("Query too long ({} > 256 bytes)", trimmed.len()).into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_valid() {
        assert!(validate_query("dune").is_ok());
        assert!(validate_query("  the matrix  ").is_ok());
    }

    #[test]
    fn test_validate_query_empty() {
        assert!(validate_query("").is_err());
        assert!(validate_query("   ").is_err());
    }

    #[test]
    fn test_validate_query_too_long() {
        assert!(validate_query(&"x".repeat(257)).is_err());
        assert!(validate_query(&"x".repeat(256)).is_ok());
    }
}
