use std::env;
use std::fs;
use std::io;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;

use crate::paths;

pub(crate) const LOG_ENV: &str = "GITGLANCE_LOG";
const LOG_FILE_NAME: &str = "gitglance.log";

/// Sends `tracing` output to `~/.gitglance/gitglance.log`; the terminal is left to the
/// report and the view.
pub(crate) fn init(level: Option<&str>) -> io::Result<()> {
    let level = resolve_level(level.map(str::to_string).or_else(|| env::var(LOG_ENV).ok()));
    if level == LevelFilter::OFF {
        return Ok(());
    }

    let path = paths::log_path().map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    let dir = path
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "log directory not found"))?;
    fs::create_dir_all(dir)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| LOG_FILE_NAME.into());

    let appender = tracing_appender::rolling::never(dir, file_name);
    tracing_subscriber::fmt()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .with_max_level(level)
        .try_init()
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
}

fn resolve_level(value: Option<String>) -> LevelFilter {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| LevelFilter::from_str(value).ok())
        .unwrap_or(LevelFilter::WARN)
}

#[cfg(test)]
mod tests {
    use super::resolve_level;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn resolve_level_defaults_to_warn() {
        assert_eq!(resolve_level(None), LevelFilter::WARN);
        assert_eq!(resolve_level(Some("  ".to_string())), LevelFilter::WARN);
        assert_eq!(resolve_level(Some("loud".to_string())), LevelFilter::WARN);
    }

    #[test]
    fn resolve_level_accepts_names() {
        assert_eq!(resolve_level(Some("debug".to_string())), LevelFilter::DEBUG);
        assert_eq!(resolve_level(Some("off".to_string())), LevelFilter::OFF);
    }
}
