use imgest_core::AppError;
use sqlx::error::ErrorKind;

/// SQLSTATE class 22: data exception (value too long, invalid text representation, ...)
const DATA_EXCEPTION_CLASS: &str = "22";

/// Classify a database failure by what caused it.
///
/// Unique violations become [`AppError::Conflict`]; constraint and data errors that the
/// caller's input produced become [`AppError::InvalidInput`]. Everything else, including
/// connection and pool failures, stays [`AppError::Database`].
pub fn classify_db_error(err: sqlx::Error) -> AppError {
    let Some(db_err) = err.as_database_error() else {
        return AppError::Database(err);
    };

    match db_err.kind() {
        ErrorKind::UniqueViolation => {
            let constraint = db_err.constraint().unwrap_or("unique constraint");
            AppError::Conflict(format!("Record violates {}", constraint))
        }
        ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
            AppError::InvalidInput(db_err.message().to_string())
        }
        _ if db_err
            .code()
            .is_some_and(|code| code.starts_with(DATA_EXCEPTION_CLASS)) =>
        {
            AppError::InvalidInput(db_err.message().to_string())
        }
        _ => AppError::Database(err),
    }
}
