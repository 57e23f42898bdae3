use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomefinError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Family {family_id} already has the maximum of {max} members")]
    MaxMembersExceeded { family_id: i64, max: u32 },

    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

/// Coarse classification used by callers that only care about the outcome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    MaxMembersExceeded,
    DbError,
    Other,
}

impl HomefinError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            // A statement the csv parser rejects is malformed input.
            Self::InvalidInput(_) | Self::Csv(_) => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MaxMembersExceeded { .. } => ErrorKind::MaxMembersExceeded,
            Self::Db(_) => ErrorKind::DbError,
            Self::Io(_) | Self::Settings(_) => ErrorKind::Other,
        }
    }
}

pub type Result<T> = std::result::Result<T, HomefinError>;
