//! Rendering errors.

use std::path::PathBuf;

use nyro_storage::StorageError;

/// Error returned when a page source cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Source file does not exist or its path is not servable.
    #[error("Source file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    /// Source file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: StorageError,
    },
}

impl RenderError {
    pub(crate) fn from_storage(path: PathBuf, source: StorageError) -> Self {
        if source.is_not_found() {
            Self::FileNotFound(path)
        } else {
            Self::Storage { path, source }
        }
    }
}

#[cfg(test)]
mod tests {
    use nyro_storage::StorageErrorKind;

    use super::*;

    #[test]
    fn test_not_found_kinds_map_to_file_not_found() {
        for kind in [StorageErrorKind::NotFound, StorageErrorKind::InvalidPath] {
            let err = RenderError::from_storage(
                PathBuf::from("docs/missing.md"),
                StorageError::new(kind),
            );
            assert!(matches!(err, RenderError::FileNotFound(_)));
        }
    }

    #[test]
    fn test_other_kinds_keep_source() {
        let err = RenderError::from_storage(
            PathBuf::from("CHANGELOG.md"),
            StorageError::new(StorageErrorKind::PermissionDenied),
        );
        assert!(matches!(err, RenderError::Storage { .. }));
        assert!(err.to_string().starts_with("Failed to read CHANGELOG.md: "));
    }
}
