use prediction_engine::{BuildError, MatchField};
use std::time::Duration;
use thiserror::Error;

/// Every way fetching the current SCCT match can fail.
#[derive(Error, Debug)]
pub enum ScctError {
    // Discovery
    #[error("Cannot reach SCCT at {target}: {source}")]
    Discovery {
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("No active SCCT instance at {target} ({scanned} candidates checked)")]
    NotFound { target: String, scanned: usize },

    #[error("SCCT discovery at {target} timed out after {after:?}")]
    Timeout { target: String, after: Duration },

    // Casting data
    #[error("Field {field} unavailable in profile {profile}: {source}")]
    FieldUnavailable {
        field: MatchField,
        profile: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {field} from {origin}: {value:?}")]
    Parse { field: String, value: String, origin: String },

    #[error("Invalid {field} from {origin}: {reason}")]
    Validation { field: String, reason: String, origin: String },

    // Configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ScctError {
    /// Attach the profile id / url to a builder failure.
    pub fn from_build(err: BuildError, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        match err {
            BuildError::Parse { field, value } => ScctError::Parse { field: field.to_string(), value, origin },
            BuildError::Validation { field, reason } => {
                ScctError::Validation { field: field.to_string(), reason, origin }
            }
        }
    }

    /// Stable tag for the JSONL event log.
    pub fn kind(&self) -> &'static str {
        match self {
            ScctError::Discovery { .. } => "DISCOVERY",
            ScctError::NotFound { .. } => "NOT_FOUND",
            ScctError::Timeout { .. } => "TIMEOUT",
            ScctError::FieldUnavailable { .. } => "FIELD_UNAVAILABLE",
            ScctError::Parse { .. } => "PARSE",
            ScctError::Validation { .. } => "VALIDATION",
            ScctError::Config(_) => "CONFIG",
        }
    }

    /// Not-found and timeout mean "SCCT not running right now", worth retrying later.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScctError::NotFound { .. } | ScctError::Timeout { .. } | ScctError::Discovery { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_errors_keep_field_and_origin() {
        let err = ScctError::from_build(
            BuildError::Parse { field: MatchField::BestOf, value: "XY".to_string() },
            "f61a",
        );
        assert_eq!(err.kind(), "PARSE");
        assert_eq!(err.to_string(), "Cannot parse bestof from f61a: \"XY\"");
        assert!(!err.is_transient());

        let err = ScctError::from_build(
            BuildError::Validation { field: MatchField::Team1, reason: "team name is empty".to_string() },
            "f61a",
        );
        assert!(matches!(err, ScctError::Validation { ref field, .. } if field == "team1"));
    }

    #[test]
    fn field_unavailable_names_profile() {
        let err = ScctError::FieldUnavailable {
            field: MatchField::Score2,
            profile: "f61a".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(err.kind(), "FIELD_UNAVAILABLE");
        assert!(err.to_string().contains("score2"));
        assert!(err.to_string().contains("f61a"));
    }
}
