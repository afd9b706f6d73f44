use cipher::CipherError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsymError {
    #[error("user `{0}` already exists")]
    DuplicateName(String),

    #[error("user `{0}` not found")]
    NotFound(String),

    #[error("user name can not be empty")]
    EmptyName,

    #[error("user name `{0}` can not be a number or contain spaces or commas")]
    InvalidName(String),

    #[error("malformed input `{token}`: {reason}")]
    MalformedInput { token: String, reason: String },

    #[error("unexpected end of input")]
    EndOfInput,

    #[error(transparent)]
    Cipher(#[from] CipherError),
}
