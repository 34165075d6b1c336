//! Error types for layout analysis and page composition.
//!
//! Most variants are non-fatal: they are recorded as diagnostics by the stage
//! that hit them and processing continues with safe defaults.

/// Result type alias for page_flow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while composing pages.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A fragment had missing or invalid geometry or font data (non-fatal)
    #[error("Malformed fragment {index} on page {page}: {reason}")]
    MalformedFragment {
        /// Page the fragment belongs to
        page: usize,
        /// Position of the fragment in the upstream list
        index: usize,
        /// What was normalized
        reason: String,
    },

    /// Page-level input problem (non-fatal)
    #[error("Invalid page {index}: {reason}")]
    InvalidPage {
        /// Page index
        index: usize,
        /// Reason
        reason: String,
    },

    /// A continuity heuristic could not be evaluated for a page pair
    #[error("Continuity heuristic failed on page {page}: {reason}")]
    ContinuityHeuristic {
        /// Page whose profile or pair evaluation failed
        page: usize,
        /// Reason for failure
        reason: String,
    },

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check whether the error is a recoverable diagnostic rather than a hard failure.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Error::MalformedFragment { .. }
                | Error::InvalidPage { .. }
                | Error::ContinuityHeuristic { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_fragment_message() {
        let err = Error::MalformedFragment {
            page: 2,
            index: 7,
            reason: "missing font size".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("fragment 7"));
        assert!(msg.contains("page 2"));
        assert!(msg.contains("missing font size"));
        assert!(err.is_diagnostic());
    }

    #[test]
    fn test_config_error_is_not_diagnostic() {
        let err = Error::InvalidConfig("negative gap".to_string());
        assert!(!err.is_diagnostic());
        assert_eq!(format!("{}", err), "Invalid configuration: negative gap");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
