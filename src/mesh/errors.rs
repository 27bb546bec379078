use thiserror::Error;

use crate::core::errors::ConnectionError;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error("invalid owner: {0}")]
    InvalidOwner(String),
    #[error("unexpected {what} format: {detail}")]
    UnexpectedFormat { what: &'static str, detail: String },
}
