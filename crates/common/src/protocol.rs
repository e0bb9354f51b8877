//! Request and response types for the public HTTP API.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Sensitive value to protect. Stored only in encrypted form.
    pub data: String,
}

/// Query-string form of `POST /users`: `?data=...`. Takes precedence over a
/// JSON body when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserQuery {
    #[serde(default)]
    pub data: Option<String>,
}

/// Response body for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserResponse {
    /// Identifier of the newly stored record.
    pub id: i64,
}

/// Response body for `GET /users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    /// The revealed plaintext.
    pub data: String,
}

// ---------------------------------------------------------------------------
// Self test
// ---------------------------------------------------------------------------

/// Response body for `GET /self-test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelfTestResponse {
    pub original: String,
    /// Base64 ciphertext under a throwaway key.
    pub encrypted: String,
    pub decrypted: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"not_found"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.message())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether a master key is loaded.
    pub master_key_ready: bool,
    /// Number of records in the store.
    pub records_stored: usize,
}
