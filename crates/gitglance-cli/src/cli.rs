use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use gitglance::{filter_snapshots, parse_status_with, MalformedLinePolicy, ParseOptions};

use crate::config::{
    load_config, load_settings, set_config_value, validate_config_value, Overrides, CONFIG_KEYS,
};
use crate::feed::load_snapshots;
use crate::paths;
use crate::report::{render_json, render_text};
use crate::tui;

#[derive(Parser)]
#[command(
    name = "gitglance",
    version,
    about = "git status for every repository in a directory"
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) settings: SettingsArgs,
    /// Log level written to ~/.gitglance/gitglance.log (error, warn, info, debug, trace, off)
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,
}

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SettingsArgs {
    /// Directory whose subdirectories are scanned
    #[arg(long, short = 'd', global = true)]
    pub(crate) directory: Option<PathBuf>,
    /// Command run in each subdirectory
    #[arg(long, global = true)]
    pub(crate) status_command: Option<String>,
    /// Hide repositories without file changes
    #[arg(long, global = true)]
    pub(crate) skip_unchanged: bool,
    /// Show every repository, overriding skip_unchanged from the config file
    #[arg(long, global = true)]
    pub(crate) show_all: bool,
}

impl SettingsArgs {
    pub(crate) fn overrides(&self) -> Overrides {
        let skip_unchanged = if self.show_all {
            Some(false)
        } else if self.skip_unchanged {
            Some(true)
        } else {
            None
        };
        Overrides {
            directory: self.directory.clone(),
            status_command: self.status_command.clone(),
            skip_unchanged,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Print the status of every repository once
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Parse saved status output from a file or stdin
    Parse {
        file: Option<PathBuf>,
        /// Prefix removed from the feed before parsing
        #[arg(long, default_value = "")]
        root: String,
        #[arg(long)]
        json: bool,
        /// Keep lines without a status code in `other` instead of failing
        #[arg(long)]
        keep_malformed: bool,
    },
    /// Start the refreshing terminal view
    Watch,
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    Show,
    Path,
    Set { key: String, value: String },
}

pub(crate) fn run_command(
    command: Commands,
    settings_args: &SettingsArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Status { json } => {
            let settings = load_settings(settings_args.overrides())?;
            let snapshots = load_snapshots(&settings)?;
            let visible = filter_snapshots(&snapshots, settings.skip_unchanged);
            print_snapshots(&visible, json)?;
        }
        Commands::Parse {
            file,
            root,
            json,
            keep_malformed,
        } => {
            let raw = match file {
                Some(path) => fs::read_to_string(path)?,
                None => {
                    let mut raw = String::new();
                    io::stdin().read_to_string(&mut raw)?;
                    raw
                }
            };
            let options = ParseOptions {
                malformed_lines: if keep_malformed {
                    MalformedLinePolicy::KeepAsOther
                } else {
                    MalformedLinePolicy::Reject
                },
                ..ParseOptions::default()
            };
            let snapshots = parse_status_with(&raw, &root, &options)?;
            let skip_unchanged = settings_args
                .overrides()
                .skip_unchanged
                .or(load_config().skip_unchanged)
                .unwrap_or(false);
            let visible = filter_snapshots(&snapshots, skip_unchanged);
            print_snapshots(&visible, json)?;
        }
        Commands::Watch => {
            let settings = load_settings(settings_args.overrides())?;
            tui::run_tui(settings)?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => {
                let settings = load_settings(settings_args.overrides())?;
                println!("directory = {}", settings.directory.display());
                println!("status_command = {}", settings.status_command);
                println!("skip_unchanged = {}", settings.skip_unchanged);
                println!("refresh_ms = {}", settings.refresh_interval.as_millis());
                println!(
                    "theme = {}",
                    crate::theme::THEMES[settings.theme_index].name
                );
            }
            ConfigCommand::Path => {
                println!("{}", paths::config_path()?.display());
            }
            ConfigCommand::Set { key, value } => {
                if !CONFIG_KEYS.contains(&key.as_str()) {
                    return Err(format!(
                        "unknown key: {key} (expected one of {})",
                        CONFIG_KEYS.join(", ")
                    )
                    .into());
                }
                validate_config_value(&key, &value)?;
                set_config_value(&key, value.trim())?;
                println!("set {key}");
            }
        },
    }

    Ok(())
}

fn print_snapshots(
    visible: &[&gitglance::RepositorySnapshot],
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&render_json(visible))?);
    } else {
        print!("{}", render_text(visible));
    }
    Ok(())
}
