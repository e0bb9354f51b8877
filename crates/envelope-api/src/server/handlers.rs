//! Axum request handlers for all service endpoints.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::protocol::{
    CreateUserQuery, CreateUserRequest, CreateUserResponse, ErrorResponse, HealthResponse,
    SelfTestResponse, UserResponse,
};
use common::ServiceError;
use envelope::{
    cipher, require_master_key, EncodedRecord, EncryptedRecord, EnvelopeError, KeyManager,
};
use tracing::{info, warn};

use super::state::AppState;
use crate::store::StoreError;

/// Plaintext round-tripped by the self-test endpoint.
pub const SELF_TEST_PLAINTEXT: &str = "Test sensitive data";

/// `POST /users` — protect `data` and store the resulting record.
///
/// `data` comes from the `?data=` query parameter when present, otherwise from
/// the JSON body. Responds `201 Created` with the new id and a `Location`
/// header.
pub async fn create_user(
    State(state): State<AppState>,
    query: Result<Query<CreateUserQuery>, QueryRejection>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Response {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return error_response(&ServiceError::BadRequest(rejection.body_text())),
    };
    let data = match (query.data, payload) {
        (Some(data), _) => data,
        (None, Ok(Json(req))) => req.data,
        (None, Err(rejection)) => {
            return error_response(&ServiceError::BadRequest(rejection.body_text()));
        }
    };
    match run_blocking(move || protect_and_store(&state, &data)).await {
        Ok(id) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/users/{id}"))],
            Json(CreateUserResponse { id }),
        )
            .into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /users/{id}` — load and reveal a stored record.
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return error_response(&ServiceError::BadRequest(rejection.body_text())),
    };
    match run_blocking(move || load_and_reveal(&state, id)).await {
        Ok(data) => (StatusCode::OK, Json(UserResponse { id, data })).into_response(),
        Err(e) => error_response(&e),
    }
}

/// `GET /users/test-encryption` (alias `GET /self-test`) — encrypt and
/// decrypt a fixed string under a throwaway data key. Touches neither the
/// master key nor the store.
pub async fn self_test() -> Response {
    match run_self_test() {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => error_response(&crypto_failure("self-test", e)),
    }
}

/// `GET /health` — liveness and readiness check.
///
/// Returns `200 OK` when a master key is loaded, `503 Service Unavailable`
/// otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let master_key_ready = state.master_key.is_some();
    let store = state.store.clone();
    let records_stored = match tokio::task::spawn_blocking(move || store.count()).await {
        Ok(Ok(n)) => n,
        Ok(Err(e)) => {
            warn!(error = %e, "failed to count stored records");
            0
        }
        Err(e) => {
            warn!(error = %e, "record count task failed");
            0
        }
    };

    let (status_code, status_str) = if master_key_ready {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        master_key_ready,
        records_stored,
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Request logic
// ---------------------------------------------------------------------------

/// Run synchronous store and crypto work on the blocking pool.
async fn run_blocking<T, F>(work: F) -> Result<T, ServiceError>
where
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.unwrap_or_else(|e| {
        warn!(error = %e, "blocking request task failed");
        Err(ServiceError::Internal("request task failed".into()))
    })
}

fn protect_and_store(state: &AppState, data: &str) -> Result<i64, ServiceError> {
    let master_key = require_master_key(state.master_key.as_deref())
        .map_err(|e| crypto_failure("encryption", e))?;
    let record = state
        .envelope
        .protect(data.as_bytes(), master_key.as_bytes())
        .map_err(|e| crypto_failure("encryption", e))?;
    let id = state
        .store
        .insert(&EncodedRecord::from(&record))
        .map_err(store_failure)?;
    info!(id, "record created");
    Ok(id)
}

fn load_and_reveal(state: &AppState, id: i64) -> Result<String, ServiceError> {
    let master_key = require_master_key(state.master_key.as_deref())
        .map_err(|e| crypto_failure("decryption", e))?;
    let encoded = state
        .store
        .get(id)
        .map_err(store_failure)?
        .ok_or_else(|| ServiceError::NotFound(format!("no record with id {id}")))?;
    let record =
        EncryptedRecord::try_from(&encoded).map_err(|e| crypto_failure("decryption", e))?;
    let plaintext = state
        .envelope
        .reveal(&record, master_key.as_bytes())
        .map_err(|e| crypto_failure("decryption", e))?;
    String::from_utf8(plaintext).map_err(|_| {
        warn!(id, "revealed payload is not valid UTF-8");
        ServiceError::EncryptionFailure("decryption failed".into())
    })
}

fn run_self_test() -> Result<SelfTestResponse, EnvelopeError> {
    let (key, iv) = KeyManager::new().generate_data_key()?;
    let encrypted = cipher::encrypt(
        SELF_TEST_PLAINTEXT.as_bytes(),
        key.as_bytes(),
        iv.as_bytes(),
    )?;
    let decrypted = cipher::decrypt(&encrypted, key.as_bytes(), iv.as_bytes())?;
    Ok(SelfTestResponse {
        original: SELF_TEST_PLAINTEXT.into(),
        encrypted: STANDARD.encode(&encrypted),
        decrypted: String::from_utf8_lossy(&decrypted).into_owned(),
    })
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Collapse a core error into a generic caller-facing failure. Details go to
/// the log only.
fn crypto_failure(operation: &'static str, err: EnvelopeError) -> ServiceError {
    match err {
        EnvelopeError::MasterKeyUnavailable => {
            ServiceError::Unavailable("master key not configured".into())
        }
        other => {
            warn!(error = %other, operation, "crypto operation failed");
            ServiceError::EncryptionFailure(format!("{operation} failed"))
        }
    }
}

fn store_failure(err: StoreError) -> ServiceError {
    warn!(error = %err, "record store failure");
    ServiceError::Internal("record store unavailable".into())
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}
