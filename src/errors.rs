use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Why a single field failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    /// Required text is empty or whitespace.
    Blank,
    /// Referenced record does not exist.
    Missing,
    /// Value collides with an existing record.
    Taken,
    /// Value is present but malformed.
    Invalid,
}

impl ValidationKind {
    fn message(self) -> &'static str {
        match self {
            ValidationKind::Blank => "can't be blank",
            ValidationKind::Missing => "must exist",
            ValidationKind::Taken => "has already been taken",
            ValidationKind::Invalid => "is invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: ValidationKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.kind.message())
    }
}

/// All field failures of one write, collected before anything is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, kind: ValidationKind) -> Self {
        let mut errors = Self::new();
        errors.add(field, kind);
        errors
    }

    pub fn add(&mut self, field: &'static str, kind: ValidationKind) {
        self.0.push(FieldError { field, kind });
    }

    /// Records `Blank` for `field` when `value` has no visible characters.
    pub fn require_present(&mut self, field: &'static str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, ValidationKind::Blank);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has(&self, field: &str, kind: ValidationKind) -> bool {
        self.0.iter().any(|e| e.field == field && e.kind == kind)
    }

    /// `Ok(())` when nothing was recorded, otherwise the collected failures.
    pub fn into_result(self) -> Result<(), StoreError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Failures of the photo store and its ownership policy.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("User {user_id} is not allowed to modify {resource} {id}")]
    Forbidden {
        user_id: i64,
        resource: &'static str,
        id: i64,
    },

    #[error("{resource} not found with id: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        StoreError::NotFound { resource, id }
    }

    pub fn validation(field: &'static str, kind: ValidationKind) -> Self {
        StoreError::Validation(ValidationErrors::single(field, kind))
    }

    /// Translates a constraint violation raised by the store on insert into a
    /// field-level validation failure; any other error passes through.
    pub fn from_insert(err: DbErr, unique_field: &'static str, foreign_field: &'static str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                StoreError::validation(unique_field, ValidationKind::Taken)
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
                StoreError::validation(foreign_field, ValidationKind::Missing)
            }
            _ => StoreError::Database(err),
        }
    }
}

impl ResponseError for StoreError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_code) = match self {
            StoreError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            StoreError::Forbidden { .. } => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            StoreError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
        };

        let body = match self {
            StoreError::Validation(errors) => json!({
                "error": {
                    "code": error_code,
                    "message": self.to_string(),
                    "fields": errors,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }
            }),
            StoreError::Database(e) => {
                log::error!("Database error: {:?}", e);
                json!({
                    "error": {
                        "code": error_code,
                        "message": "Database error",
                        "timestamp": chrono::Utc::now().to_rfc3339()
                    }
                })
            }
            _ => json!({
                "error": {
                    "code": error_code,
                    "message": self.to_string(),
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }
            }),
        };

        HttpResponse::build(status).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Forbidden { .. } => StatusCode::FORBIDDEN,
            StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
            StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
