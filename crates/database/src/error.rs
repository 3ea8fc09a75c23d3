use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database connection configuration: {0}")]
    ConnectionConfig(String),

    #[error("No usable database connection: {0}")]
    ConnectionUnavailable(#[source] sqlx::Error),

    #[error("The requested property was not found in the database.")]
    NotFound,

    #[error("The database rejected the write: {0}")]
    ConstraintViolation(#[source] sqlx::Error),

    #[error("A stored value could not be decoded: {0}")]
    Decode(String),

    #[error("Database query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl DbError {
    /// Classifies a raw driver error from a business statement.
    ///
    /// Constraint violations get their own variant so the web layer can
    /// log them loudly: the application validates before writing, so a
    /// CHECK or NOT NULL failure means a validation gap, not bad input.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        let constraint = matches!(
            &err,
            sqlx::Error::Database(db) if matches!(
                db.kind(),
                sqlx::error::ErrorKind::CheckViolation
                    | sqlx::error::ErrorKind::NotNullViolation
                    | sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
            )
        );

        match err {
            sqlx::Error::PoolClosed | sqlx::Error::PoolTimedOut => {
                DbError::ConnectionUnavailable(err)
            }
            _ if constraint => DbError::ConstraintViolation(err),
            _ => DbError::Query(err),
        }
    }
}
