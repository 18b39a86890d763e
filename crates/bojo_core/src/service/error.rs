//! User-facing error taxonomy.

use crate::config::ConfigError;
use crate::db::DbError;
use crate::model::item::ItemId;
use crate::model::marker::MarkerParseError;
use crate::query::display::RangeError;
use crate::repo::item_repo::RepoError;
use crate::service::schedule::TimeParseError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type JournalResult<T> = Result<T, JournalError>;

/// Terminal error for one journal command.
#[derive(Debug)]
pub enum JournalError {
    /// Caller input violates a precondition. Shown verbatim.
    Validation(String),
    NotFound(ItemId),
    /// Display number outside the last shown list.
    Range(RangeError),
    /// Persistence failure; no partial commit is visible.
    Storage(RepoError),
    Io(std::io::Error),
}

impl JournalError {
    /// Process exit code for this error class.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::NotFound(_) => 3,
            Self::Range(_) => 4,
            Self::Storage(_) | Self::Io(_) => 5,
        }
    }
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound(id) => write!(f, "item {id} not found"),
            Self::Range(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "storage error: {err}"),
            Self::Io(err) => write!(f, "i/o error: {err}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(_) | Self::NotFound(_) => None,
            Self::Range(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for JournalError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err.to_string()),
            RepoError::NotFound(id) => Self::NotFound(id),
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for JournalError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

impl From<RangeError> for JournalError {
    fn from(value: RangeError) -> Self {
        Self::Range(value)
    }
}

impl From<MarkerParseError> for JournalError {
    fn from(value: MarkerParseError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TimeParseError> for JournalError {
    fn from(value: TimeParseError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<ConfigError> for JournalError {
    fn from(value: ConfigError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<std::io::Error> for JournalError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[cfg(test)]
mod tests {
    use super::JournalError;
    use crate::model::item::ItemValidationError;
    use crate::query::display::RangeError;
    use crate::repo::item_repo::RepoError;

    #[test]
    fn repo_errors_map_onto_taxonomy() {
        let validation: JournalError = RepoError::Validation(ItemValidationError::EmptyDescription).into();
        assert_eq!(validation.exit_code(), 2);

        let not_found: JournalError = RepoError::NotFound(4).into();
        assert!(matches!(not_found, JournalError::NotFound(4)));
        assert_eq!(not_found.exit_code(), 3);

        let storage: JournalError = RepoError::InvalidData("bad".to_string()).into();
        assert_eq!(storage.exit_code(), 5);
    }

    #[test]
    fn range_error_has_its_own_exit_code() {
        let err: JournalError = RangeError { requested: 3, len: 2 }.into();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("out of range"));
    }
}
