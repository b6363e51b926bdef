/// Errors that can occur when talking to a Limelight.
///
/// Wire decoding never produces one of these: malformed arrays degrade to
/// absent or default values instead.
#[derive(Debug, thiserror::Error)]
pub enum LimelightError {
    #[error("JSON results error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("HTTP request returned status {0}")]
    HttpStatus(u16),

    #[error("Limelight \"{0}\" not available (no getpipe key)")]
    NotAvailable(String),

    #[error("Failed to spawn thread: {0}")]
    Thread(String),
}
