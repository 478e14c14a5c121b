use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("telegram_id is already registered")]
    Duplicate,

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return RepoError::Duplicate;
            }
            if db_err.is_check_violation() {
                return RepoError::Constraint(db_err.message().to_string());
            }
        }
        RepoError::Database(err)
    }
}

pub type RepoResult<T> = Result<T, RepoError>;
