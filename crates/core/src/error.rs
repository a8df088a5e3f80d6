use serde::Serialize;
use validator::ValidationErrors;

use crate::store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid input: {} field error(s)", .0.len())]
    InvalidInput(Vec<FieldError>),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(constraint) => CoreError::Conflict(format!(
                "Duplicate value violates unique constraint: {constraint}"
            )),
            StoreError::Backend(source) => CoreError::Internal(source.to_string()),
        }
    }
}

/// A single field-level validation failure, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Flatten `validator` output into a stable, sorted list of [`FieldError`]s.
///
/// Field names are reported in the camelCase spelling used on the wire.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |err| FieldError {
                field: field.clone(),
                message: err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value ({})", err.code)),
            })
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    out
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn camel_case_converts_snake_names() {
        assert_eq!(camel_case("video_url"), "videoUrl");
        assert_eq!(camel_case("title"), "title");
    }

    #[test]
    fn field_errors_are_sorted_and_carry_messages() {
        let mut errors = ValidationErrors::new();
        let mut rating = ValidationError::new("range");
        rating.message = Some("Rating is required".into());
        errors.add("rating", rating);
        errors.add("video_url", ValidationError::new("regex"));

        let list = field_errors(&errors);
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].field, "rating");
        assert_eq!(list[0].message, "Rating is required");
        assert_eq!(list[1].field, "videoUrl");
        assert_eq!(list[1].message, "Invalid value (regex)");
    }

    #[test]
    fn duplicate_store_error_becomes_conflict() {
        let err = CoreError::from(StoreError::Duplicate("uq_users_email".into()));
        assert!(matches!(err, CoreError::Conflict(msg) if msg.contains("uq_users_email")));
    }
}
