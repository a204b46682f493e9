use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalError {
    #[error("missing indicator '{field}' on input series")]
    MissingIndicator { field: &'static str },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
