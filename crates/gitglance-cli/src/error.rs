use thiserror::Error;

use gitglance::GlanceError;

#[derive(Debug, Error)]
pub(crate) enum FeedError {
    #[error("home directory not found")]
    HomeDirMissing,
    #[error("cannot read directory {path}: {source}")]
    ReadDirectory {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot run status command `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },
    #[error(transparent)]
    Parse(#[from] GlanceError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
