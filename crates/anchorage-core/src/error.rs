use std::fmt;
use std::path::PathBuf;

/// Machine-readable error codes for scripts that wrap `anc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    EmptyInput,
    MalformedInput,
    InvalidRecord,
    ConfigParseError,
    EmbeddingsUnreadable,
    RoundTripMismatch,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyInput => "E1001",
            Self::MalformedInput => "E1002",
            Self::InvalidRecord => "E1003",
            Self::ConfigParseError => "E1004",
            Self::EmbeddingsUnreadable => "E1005",
            Self::RoundTripMismatch => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::EmptyInput => "Input payload is empty",
            Self::MalformedInput => "Input payload is malformed",
            Self::InvalidRecord => "Paragraph record failed validation",
            Self::ConfigParseError => "Config file parse error",
            Self::EmbeddingsUnreadable => "Embeddings file could not be read",
            Self::RoundTripMismatch => "Result failed serialization round-trip",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::EmptyInput => Some("Pipe a JSON document into stdin."),
            Self::MalformedInput => {
                Some("Graph input must be {\"links\": [...]}; paragraph input must be a JSON list.")
            }
            Self::InvalidRecord => {
                Some("Every paragraph needs a non-empty embedding of the same dimension.")
            }
            Self::ConfigParseError => Some("Fix syntax in anchorage.toml and retry."),
            Self::EmbeddingsUnreadable => Some("Check the embeddings path and permissions."),
            Self::RoundTripMismatch => Some("This is a bug. Report it with the input that triggered it."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Fatal input and consistency failures.
///
/// Anything that maps to one of these ends the invocation with a non-zero
/// exit status. Per-record problems that can be skipped (bad JSONL lines,
/// missing embeddings for a bridge pair) never surface as an `InputError`.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("{what} is empty")]
    Empty { what: &'static str },

    #[error("failed to parse {what}: {source}")]
    Malformed {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("paragraph {index} ('{header}'): {reason}")]
    InvalidRecord {
        index: usize,
        header: String,
        reason: String,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("centrality result did not survive a JSON round-trip")]
    RoundTrip,
}

impl InputError {
    /// The stable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::Empty { .. } => ErrorCode::EmptyInput,
            Self::Malformed { .. } => ErrorCode::MalformedInput,
            Self::InvalidRecord { .. } => ErrorCode::InvalidRecord,
            Self::Config { .. } => ErrorCode::ConfigParseError,
            Self::Unreadable { .. } => ErrorCode::EmbeddingsUnreadable,
            Self::RoundTrip => ErrorCode::RoundTripMismatch,
        }
    }

    /// Remediation hint, falling back to the code summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
