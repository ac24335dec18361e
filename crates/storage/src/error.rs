use thiserror::Error;

pub type AssetResult<T> = Result<T, AssetError>;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("asset not found: {key}")]
    NotFound { key: String },

    #[error("asset backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AssetError {
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub fn backend<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(error),
        }
    }
}
