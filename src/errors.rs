use thiserror::Error;

/// Error type surfaced at the CLI boundary, each variant carrying an exit code
#[derive(Debug, Error)]
pub enum FollowCheckError {
    /// Current page is not on the target site (exit code 2)
    #[error("Please run followcheck on the {expected} website (current page: {actual})")]
    WrongHost { expected: String, actual: String },
    /// Neither list produced a single handle (exit code 3)
    #[error("Could not retrieve any followers or following")]
    NothingRetrieved,
    /// WebDriver connection failed (exit code 4)
    #[error("WebDriver connection failed: {0}")]
    WebDriverFailed(String),
    /// Operation timeout (exit code 5)
    #[error("Operation timed out: {0}")]
    Timeout(String),
    /// The run started but a step failed unexpectedly (exit code 6)
    #[error("Run aborted: {0}")]
    Aborted(String),
    /// Generic error (exit code 1)
    #[error(transparent)]
    Other(anyhow::Error),
}

impl FollowCheckError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            FollowCheckError::WrongHost { .. } => 2,
            FollowCheckError::NothingRetrieved => 3,
            FollowCheckError::WebDriverFailed(_) => 4,
            FollowCheckError::Timeout(_) => 5,
            FollowCheckError::Aborted(_) => 6,
            FollowCheckError::Other(_) => 1,
        }
    }
}

impl From<anyhow::Error> for FollowCheckError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<FollowCheckError>() {
            Ok(typed) => return typed,
            Err(err) => err,
        };

        // Fall back to the message for errors raised deep inside fantoccini/reqwest
        let msg = err.to_string();

        if msg.contains("Failed to connect to WebDriver")
            || msg.contains("WebDriver")
            || msg.contains("geckodriver")
            || msg.contains("chromedriver")
        {
            FollowCheckError::WebDriverFailed(msg)
        } else if msg.contains("timeout") || msg.contains("timed out") {
            FollowCheckError::Timeout(msg)
        } else {
            FollowCheckError::Other(err)
        }
    }
}
