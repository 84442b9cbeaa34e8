//! Where the backend services live.

use std::time::Duration;

/// Base URLs of the four collaborators plus the per-call timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendEndpoints {
    /// Identity service.
    pub users: String,
    /// Prompt-set (dice) service.
    pub dice: String,
    /// Narrative service.
    pub stories: String,
    /// Reaction service.
    pub reactions: String,
    /// Upper bound for one call, connect through body.
    pub timeout: Duration,
}

impl Default for BackendEndpoints {
    fn default() -> Self {
        Self {
            users: "http://127.0.0.1:5001".to_owned(),
            dice: "http://127.0.0.1:5002".to_owned(),
            stories: "http://127.0.0.1:5003".to_owned(),
            reactions: "http://127.0.0.1:5004".to_owned(),
            timeout: Duration::from_millis(2000),
        }
    }
}
