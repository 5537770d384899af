use thiserror::Error;

#[derive(Error, Debug)]
pub enum PhpscopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("document unavailable: {0}")]
    Unavailable(String),
    #[error("contract violation: {0}")]
    Contract(&'static str),
}

pub type Result<T> = std::result::Result<T, PhpscopeError>;
