use crate::graph::GraphError;
use crate::model::kind::EntityRef;
use crate::model::timestamp::TIMESTAMP_HINT;
use crate::store::{IdsExhausted, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced by facade operations.
///
/// Lookups that miss are not errors; they come back as `None`, `false` or a
/// failed `LinkOutcome`.
#[derive(Debug)]
pub enum ServiceError {
    /// Date-like input could not be parsed.
    MalformedDate { field: &'static str, value: String },
    /// Dependent-note parent does not exist.
    ParentNotFound(EntityRef),
    /// No id is left for a new record.
    IdsExhausted(IdsExhausted),
    /// Saving the store failed.
    Store(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedDate { field, value } => write!(
                f,
                "Invalid date format for `{field}`: `{value}`. Please use ISO format {TIMESTAMP_HINT}"
            ),
            Self::ParentNotFound(parent) => {
                write!(f, "{} with id {} not found", parent.kind, parent.id)
            }
            Self::IdsExhausted(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "failed to save store: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IdsExhausted(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<IdsExhausted> for ServiceError {
    fn from(value: IdsExhausted) -> Self {
        Self::IdsExhausted(value)
    }
}

impl From<GraphError> for ServiceError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::ParentNotFound(parent) => Self::ParentNotFound(parent),
            GraphError::IdsExhausted(err) => Self::IdsExhausted(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ServiceError;

    #[test]
    fn malformed_date_message_echoes_expected_format() {
        let err = ServiceError::MalformedDate {
            field: "due_date",
            value: "someday".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("someday"));
        assert!(message.contains("2026-02-10T14:00:00"));
    }
}
