use thiserror::Error;

pub mod agenda;
pub mod domain;

pub use domain::*;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Database query error: {0}")]
    DatabaseQueryError(#[from] dao::DaoError),

    #[error("not found")]
    NotFound,

    #[error("no usable data: {0}")]
    NoData(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}
