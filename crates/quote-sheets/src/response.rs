//! The one-line JSON answer printed on stdout

use serde::Serialize;

/// `{"success":true,"file":...}` or `{"error":...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Response {
    Success { success: bool, file: String },
    Error { error: String },
}

impl Response {
    pub fn success(file: impl Into<String>) -> Self {
        Response::Success {
            success: true,
            file: file.into(),
        }
    }

    pub fn error(message: impl ToString) -> Self {
        Response::Error {
            error: message.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    /// Serialize to a single JSON line
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
