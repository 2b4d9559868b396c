use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::FeedError;
use crate::paths::{self, absolute_directory, expand_home, DIRECTORY_ENV};
use crate::theme::{default_theme_index, theme_index_by_name};

pub(crate) const DEFAULT_STATUS_COMMAND: &str = "git status --short --branch";
pub(crate) const DEFAULT_REFRESH_MS: u64 = 5000;
pub(crate) const MIN_REFRESH_MS: u64 = 500;

pub(crate) const CONFIG_KEYS: [&str; 5] = [
    "directory",
    "status_command",
    "skip_unchanged",
    "refresh_ms",
    "theme",
];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) directory: Option<String>,
    pub(crate) status_command: Option<String>,
    pub(crate) skip_unchanged: Option<bool>,
    pub(crate) refresh_ms: Option<u64>,
    pub(crate) theme: Option<String>,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub(crate) struct Overrides {
    pub(crate) directory: Option<PathBuf>,
    pub(crate) status_command: Option<String>,
    pub(crate) skip_unchanged: Option<bool>,
}

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) directory: PathBuf,
    pub(crate) status_command: String,
    pub(crate) skip_unchanged: bool,
    pub(crate) refresh_interval: Duration,
    pub(crate) theme_index: usize,
}

impl Settings {
    /// The prefix handed to the parser; every marker line the feed prints starts with it.
    pub(crate) fn root_prefix(&self) -> String {
        self.directory.display().to_string()
    }
}

pub(crate) fn load_config() -> Config {
    let Ok(path) = paths::config_path() else {
        return Config::default();
    };

    let Ok(contents) = fs::read_to_string(path) else {
        return Config::default();
    };

    parse_config(&contents)
}

fn parse_config(contents: &str) -> Config {
    let mut config = Config::default();

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
            continue;
        }

        let mut parts = line.splitn(2, '=');
        let key = parts.next().unwrap_or_default().trim();
        let Some(value) = parts.next() else {
            continue;
        };
        let value = value.trim();

        match key {
            "directory" => {
                let directory = trim_quotes(value);
                if !directory.is_empty() {
                    config.directory = Some(directory);
                }
            }
            "status_command" | "git_command" => {
                let command = trim_quotes(value);
                if !command.trim().is_empty() {
                    config.status_command = Some(command);
                }
            }
            "skip_unchanged" => {
                if let Some(enabled) = parse_bool(value) {
                    config.skip_unchanged = Some(enabled);
                }
            }
            "refresh_ms" => {
                if let Ok(ms) = trim_quotes(value).parse::<u64>() {
                    config.refresh_ms = Some(ms);
                }
            }
            "theme" => {
                let theme = trim_quotes(value);
                if !theme.is_empty() {
                    config.theme = Some(theme);
                }
            }
            _ => {}
        }
    }

    config
}

/// Merges flags, environment, config file and defaults, in that order of precedence.
pub(crate) fn resolve_settings(config: Config, overrides: Overrides) -> Result<Settings, FeedError> {
    let directory = match overrides.directory {
        Some(directory) => directory,
        None => match env::var(DIRECTORY_ENV).ok().filter(|value| !value.trim().is_empty()) {
            Some(value) => expand_home(value.trim())?,
            None => match config.directory.as_deref() {
                Some(value) => expand_home(value)?,
                None => env::current_dir()?,
            },
        },
    };
    let directory = absolute_directory(&directory)?;

    let status_command = overrides
        .status_command
        .or(config.status_command)
        .map(|command| command.trim().to_string())
        .filter(|command| !command.is_empty())
        .unwrap_or_else(|| DEFAULT_STATUS_COMMAND.to_string());

    let skip_unchanged = overrides
        .skip_unchanged
        .or(config.skip_unchanged)
        .unwrap_or(false);

    let refresh_ms = config
        .refresh_ms
        .unwrap_or(DEFAULT_REFRESH_MS)
        .max(MIN_REFRESH_MS);

    let theme_index = config
        .theme
        .as_deref()
        .and_then(theme_index_by_name)
        .unwrap_or_else(default_theme_index);

    Ok(Settings {
        directory,
        status_command,
        skip_unchanged,
        refresh_interval: Duration::from_millis(refresh_ms),
        theme_index,
    })
}

pub(crate) fn load_settings(overrides: Overrides) -> Result<Settings, FeedError> {
    resolve_settings(load_config(), overrides)
}

/// Checks a `config set` value before it is written.
pub(crate) fn validate_config_value(key: &str, value: &str) -> Result<(), FeedError> {
    let invalid = |message: &str| FeedError::InvalidSetting {
        key: key.to_string(),
        message: message.to_string(),
    };
    match key {
        "skip_unchanged" => parse_bool(value)
            .map(|_| ())
            .ok_or_else(|| invalid("expected true or false")),
        "refresh_ms" => value
            .trim()
            .parse::<u64>()
            .map(|_| ())
            .map_err(|_| invalid("expected a number of milliseconds")),
        "theme" => theme_index_by_name(value.trim())
            .map(|_| ())
            .ok_or_else(|| invalid("unknown theme")),
        "directory" | "status_command" => {
            if value.trim().is_empty() {
                Err(invalid("value required"))
            } else {
                Ok(())
            }
        }
        _ => Err(invalid("unknown key")),
    }
}

pub(crate) fn set_config_value(key: &str, value: &str) -> io::Result<()> {
    let path = paths::config_path().map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut lines = Vec::new();
    let mut found = false;
    let escaped = escape_toml_string(value);

    if let Ok(contents) = fs::read_to_string(&path) {
        for line in contents.lines() {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') && !trimmed.starts_with('[') {
                if let Some((existing, _)) = trimmed.split_once('=') {
                    if existing.trim() == key {
                        lines.push(format!("{key} = \"{escaped}\""));
                        found = true;
                        continue;
                    }
                }
            }
            lines.push(line.to_string());
        }
    }

    if !found {
        lines.push(format!("{key} = \"{escaped}\""));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    fs::write(path, output)
}

fn trim_quotes(value: &str) -> String {
    let trimmed = value.trim();
    let inner = ['"', '\'']
        .into_iter()
        .find_map(|quote| {
            trimmed
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
        })
        .unwrap_or(trimmed);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

fn escape_toml_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn parse_bool(value: &str) -> Option<bool> {
    let normalized = trim_quotes(value).trim().to_ascii_lowercase();
    match normalized.as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
