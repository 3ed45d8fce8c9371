use thiserror::Error;

pub type Result<T> = std::result::Result<T, KanbanError>;

#[derive(Debug, Error)]
pub enum KanbanError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    BadInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl KanbanError {
    pub fn board_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Board {}", id))
    }

    pub fn list_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("List {}", id))
    }

    pub fn card_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Card {}", id))
    }

    pub fn image_not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("Image {}", id))
    }
}

#[cfg(feature = "sqlite-storage")]
impl From<rusqlite::Error> for KanbanError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
