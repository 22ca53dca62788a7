//! Error types for the HTTP server.

use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nyro_storage::StorageError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Content file not found at the given path.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Bundled asset not found.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// Content file exists but could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::FileNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "File not found", "path": path.display().to_string()}),
            ),
            Self::AssetNotFound(path) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Asset not found", "path": path}),
            ),
            Self::Storage(e) => {
                tracing::error!(error = %e, "Failed to read content file");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": "Failed to read content file"}),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use nyro_storage::StorageErrorKind;

    use super::*;

    #[test]
    fn test_file_not_found_status() {
        let response = ServerError::FileNotFound(PathBuf::from("docs/missing.png")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_storage_error_status() {
        let response =
            ServerError::Storage(StorageError::new(StorageErrorKind::PermissionDenied))
                .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
