use serde_json::json;
use shelf_db::CatalogError;
use shelf_http::AppError;
use shelf_storage::AssetError;
use thiserror::Error;

/// Workflow step a storage failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    List,
    Get,
    Update,
    AttachImage,
    Delete,
}

impl Operation {
    /// Message shown to clients when the step fails on the server side
    fn client_message(self) -> &'static str {
        match self {
            Operation::Create => "Could not create book",
            Operation::List => "Failed to retrieve books",
            Operation::Get => "Failed to retrieve book",
            Operation::Update => "Update failed",
            Operation::AttachImage => "Upload failed",
            Operation::Delete => "Delete failed",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::List => "list",
            Operation::Get => "get",
            Operation::Update => "update",
            Operation::AttachImage => "attach image",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BookError {
    #[error("missing or invalid fields: {}", fields.join(", "))]
    Validation { fields: Vec<&'static str> },

    #[error("book not found: {id}")]
    NotFound { id: String },

    /// The object could not be written or made public; the catalog is untouched.
    #[error("image upload failed: {0}")]
    Upload(#[source] AssetError),

    #[error("{operation} failed: {source}")]
    Storage {
        operation: Operation,
        #[source]
        source: CatalogError,
    },
}

impl BookError {
    pub fn validation(fields: Vec<&'static str>) -> Self {
        Self::Validation { fields }
    }

    /// Map a catalog failure, keeping not-found distinct from backend errors.
    pub(crate) fn catalog(operation: Operation) -> impl FnOnce(CatalogError) -> Self {
        move |source| match source {
            CatalogError::NotFound { id } => Self::NotFound { id },
            source => Self::Storage { operation, source },
        }
    }

    /// Map every catalog failure, a missing record included, to a storage
    /// error. Used by the writes that do not look the record up first.
    pub(crate) fn storage(operation: Operation) -> impl FnOnce(CatalogError) -> Self {
        move |source| Self::Storage { operation, source }
    }
}

impl From<BookError> for AppError {
    fn from(error: BookError) -> Self {
        match error {
            BookError::Validation { fields } => AppError::validation(
                fields
                    .iter()
                    .map(|field| json!({ "field": field, "error": "required" }))
                    .collect(),
                "Missing required fields",
            ),
            BookError::NotFound { .. } => AppError::not_found("Book not found"),
            BookError::Upload(source) => {
                AppError::internal("upload_failed", Operation::AttachImage.client_message(), source)
            }
            BookError::Storage { operation, source } => {
                AppError::internal("storage_error", operation.client_message(), source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn catalog_not_found_stays_not_found() {
        let error = BookError::catalog(Operation::Update)(CatalogError::not_found("b1"));
        assert!(matches!(error, BookError::NotFound { ref id } if id == "b1"));
        assert_eq!(AppError::from(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_mapping_folds_missing_records_into_server_errors() {
        let error = BookError::storage(Operation::Update)(CatalogError::not_found("b1"));
        assert!(matches!(
            error,
            BookError::Storage {
                operation: Operation::Update,
                ..
            }
        ));

        let app_error = AppError::from(error);
        assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match app_error {
            AppError::Internal { message, .. } => assert_eq!(message, "Update failed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn backend_failures_become_server_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let error = BookError::catalog(Operation::Delete)(CatalogError::backend(io));
        assert_eq!(error.to_string(), "delete failed: catalog backend error: connection reset");

        let app_error = AppError::from(error);
        assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        match app_error {
            AppError::Internal { message, .. } => assert_eq!(message, "Delete failed"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validation_lists_fields() {
        let app_error = AppError::from(BookError::validation(vec!["title", "genre"]));
        assert_eq!(app_error.status(), StatusCode::BAD_REQUEST);
        match app_error {
            AppError::Validation { details, .. } => {
                assert_eq!(details.len(), 2);
                assert_eq!(details[1]["field"], "genre");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
