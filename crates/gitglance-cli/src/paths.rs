use std::env;
use std::path::{Path, PathBuf};

use crate::error::FeedError;

pub(crate) const HOME_ENV: &str = "GITGLANCE_HOME";
pub(crate) const DIRECTORY_ENV: &str = "GITGLANCE_DIRECTORY";

pub(crate) fn config_root() -> Result<PathBuf, FeedError> {
    if let Some(root) = env::var_os(HOME_ENV) {
        if !root.is_empty() {
            return Ok(PathBuf::from(root));
        }
    }

    let home = dirs::home_dir().ok_or(FeedError::HomeDirMissing)?;
    Ok(home.join(".gitglance"))
}

pub(crate) fn config_path() -> Result<PathBuf, FeedError> {
    Ok(config_root()?.join("config.toml"))
}

pub(crate) fn log_path() -> Result<PathBuf, FeedError> {
    Ok(config_root()?.join("gitglance.log"))
}

pub(crate) fn expand_home(value: &str) -> Result<PathBuf, FeedError> {
    if value == "~" || value.starts_with("~/") {
        let home = dirs::home_dir().ok_or(FeedError::HomeDirMissing)?;
        let suffix = value.strip_prefix("~/").unwrap_or("");
        return Ok(home.join(suffix));
    }
    Ok(PathBuf::from(value))
}

/// Makes `path` absolute so that every line the feed prints starts with a separator.
pub(crate) fn absolute_directory(path: &Path) -> Result<PathBuf, FeedError> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    };
    Ok(joined.canonicalize().unwrap_or(joined))
}
