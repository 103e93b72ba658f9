use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A mandatory identity field (student name/ID, class name) is empty.
    /// Fatal for that student only; bulk runs collect it and continue.
    #[error("missing identity field `{field}` for student {student_id}")]
    MissingIdentity {
        student_id: String,
        field: &'static str,
    },

    /// Margins are negative or leave no printable area. Fatal for the whole
    /// run: all students in a batch render with the same margins.
    #[error("invalid margins: {0}")]
    InvalidMargins(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
