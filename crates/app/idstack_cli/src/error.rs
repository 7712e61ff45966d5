use idstack_core::config::LoadError;
use idstack_core::{ChangeError, ConfigurationError, InternalInvariantViolation, PipelineError};
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("Fmt::{:?}: {}", .0, .0)]
    Fmt(#[from] std::fmt::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("{}", .0)]
    Load(#[from] LoadError),

    #[error("{}", .0)]
    Pipeline(#[from] PipelineError),

    #[error("{}", .0)]
    Change(#[from] ChangeError),

    #[error("Json::{}", .0)]
    Json(#[from] serde_json::Error),

    #[error("Yaml::{}", .0)]
    Yaml(#[from] serde_yaml::Error),
}

impl From<ConfigurationError> for Error {
    fn from(e: ConfigurationError) -> Self {
        Error::Pipeline(e.into())
    }
}

impl From<InternalInvariantViolation> for Error {
    fn from(e: InternalInvariantViolation) -> Self {
        Error::Pipeline(e.into())
    }
}
