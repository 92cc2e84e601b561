use thiserror::Error;

#[derive(Debug, Error)]
pub enum GroupingError {
    #[error("invalid identity: {kind} has no unique identifier")]
    InvalidIdentity { kind: &'static str },
    #[error("duplicate entity kind in row: {kind}")]
    DuplicateKind { kind: &'static str },
    #[error("mapping error: {0}")]
    Mapping(String),
    #[error("query error: {0}")]
    Query(String),
    #[error("column not found: {0}")]
    ColumnNotFound(String),
    #[error("column error: {0}")]
    Column(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl GroupingError {
    pub fn invalid_identity(kind: &'static str) -> Self {
        GroupingError::InvalidIdentity { kind }
    }

    pub fn duplicate_kind(kind: &'static str) -> Self {
        GroupingError::DuplicateKind { kind }
    }

    pub fn mapping<T: Into<String>>(msg: T) -> Self {
        GroupingError::Mapping(msg.into())
    }

    pub fn query<T: Into<String>>(msg: T) -> Self {
        GroupingError::Query(msg.into())
    }

    pub fn column_not_found<T: Into<String>>(msg: T) -> Self {
        GroupingError::ColumnNotFound(msg.into())
    }

    pub fn column<T: Into<String>>(msg: T) -> Self {
        GroupingError::Column(msg.into())
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        GroupingError::InvalidInput(msg.into())
    }
}
