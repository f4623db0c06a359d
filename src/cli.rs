use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ConfigOverrides;
use crate::error::{LogError, Result};
use crate::format::Message;
use crate::logger::{LogOptions, DEFAULT_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "prettylog",
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
pub struct Cli {
    /// Logger name (also the default log file name)
    #[arg(short, long, default_value = DEFAULT_NAME, global = true)]
    pub name: String,

    /// Directory holding the log file
    #[arg(short, long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Minimum severity: debug, info, warn, error
    #[arg(short, long, value_name = "LEVEL", global = true)]
    pub level: Option<String>,

    /// Render lists and mappings as structured blocks
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Also capture `log` records of the whole process in the log file
    #[arg(long, global = true)]
    pub join_root: bool,

    /// YAML file with a `logger:` section
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Roll the log file over before it reaches this size (0 disables)
    #[arg(long, value_name = "BYTES", global = true)]
    pub max_bytes: Option<u64>,

    /// Number of rolled-over files to keep
    #[arg(long, value_name = "COUNT", global = true)]
    pub backup_count: Option<usize>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log a debug record
    Debug(LogArgs),
    /// Log an info record
    Info(LogArgs),
    /// Log a warning
    #[command(alias = "warning")]
    Warn(LogArgs),
    /// Log an error
    Error(LogArgs),
    /// Print a message unconditionally (logged at info, untagged)
    Echo(MessageArgs),
    /// Log a PROFILE record at debug level
    Profile(MessageArgs),
}

#[derive(Args, Debug)]
pub struct MessageArgs {
    /// Parse the message as JSON
    #[arg(long)]
    pub json: bool,

    /// Message words, joined with spaces
    #[arg(name = "MESSAGE", allow_hyphen_values = true)]
    pub words: Vec<String>,
}

#[derive(Args, Debug)]
pub struct LogArgs {
    /// Print to the console even below the current level
    #[arg(long)]
    pub force_print: bool,

    /// Render lists and mappings as structured blocks for this call
    #[arg(long)]
    pub force_pretty: bool,

    /// Omit the timestamp and tag header
    #[arg(long, conflicts_with = "tag")]
    pub no_tag: bool,

    /// Tag to use instead of the level name
    #[arg(long, value_name = "TAG")]
    pub tag: Option<String>,

    #[command(flatten)]
    pub message: MessageArgs,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            dir: self.dir.clone(),
            level: self.level.clone(),
            pretty: self.pretty.then_some(true),
            join_root: self.join_root.then_some(true),
            max_bytes: self.max_bytes,
            backup_count: self.backup_count,
            config_file: self.config.clone(),
            ..ConfigOverrides::default()
        }
    }
}

impl MessageArgs {
    pub fn message(&self) -> Result<Message<'static>> {
        let text = self.words.join(" ");
        if self.json {
            let value: serde_json::Value = serde_json::from_str(&text)
                .map_err(|err| LogError::format(format!("invalid JSON message: {}", err)))?;
            Ok(value.into())
        } else {
            Ok(text.into())
        }
    }
}

impl LogArgs {
    pub fn options(&self) -> LogOptions {
        LogOptions {
            force_pretty: self.force_pretty,
            force_print: self.force_print,
            use_tag: !self.no_tag,
            tag: self.tag.clone(),
        }
    }
}
