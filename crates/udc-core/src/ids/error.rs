use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{kind} must not be empty")]
    Empty { kind: &'static str },

    #[error("{kind} exceeds {max} bytes (got {len})")]
    TooLong {
        kind: &'static str,
        max: usize,
        len: usize,
    },
}
