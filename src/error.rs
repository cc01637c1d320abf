use thiserror::Error;

/// Failures that abort a comparison request.
///
/// Malformed entries inside an otherwise valid package list are skipped during
/// parsing and never surface here.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("branch name must not be empty")]
    EmptyBranchName,

    #[error("unknown branch: {0}")]
    UnknownBranch(String),

    #[error("request for {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed package list for {branch}: {reason}")]
    Parse { branch: String, reason: String },

    #[error("failed to encode comparison result: {0}")]
    Encode(String),
}
