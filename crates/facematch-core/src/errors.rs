use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use facematch_config::ConfigError;
use thiserror::Error;

use crate::service::ServiceError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{context}")]
    RemoteService {
        context: &'static str,
        #[source]
        source: ServiceError,
    },

    #[error("no face was detected in {path}")]
    NoFaceDetected { path: PathBuf },

    #[error("comparison returned {count} unmatched face(s) and no match")]
    UnmatchedFaces { count: usize },

    #[error("similarity threshold {0} is outside 0-100")]
    InvalidThreshold(f32),

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("failed to read configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::ImageRead { .. } => ExitCode::from(2),
            AppError::InvalidThreshold(_) => ExitCode::from(2),
            AppError::ConfigRead { .. } => ExitCode::from(2),
            AppError::ConfigParse { .. } => ExitCode::from(2),
            AppError::RemoteService { .. } => ExitCode::from(3),
            AppError::NoFaceDetected { .. } => ExitCode::from(4),
            AppError::UnmatchedFaces { .. } => ExitCode::from(4),
            _ => ExitCode::from(1),
        }
    }

    pub fn human_message(&self) -> String {
        self.to_string()
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Read { path, source } => AppError::ConfigRead { path, source },
            ConfigError::Parse { path, message } => AppError::ConfigParse { path, message },
        }
    }
}
