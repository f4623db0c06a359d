#![doc = include_str!("../README.md")]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod handler;
pub mod level;
pub mod logger;
pub mod printer;
pub mod registry;

pub use config::{ConfigOverrides, LoggerConfig};
pub use error::{ConfigError, LogError, Result};
pub use format::{Message, Pretty, StructCleaner};
pub use level::Method;
pub use log::Level;
pub use logger::{global, LogOptions, Logger};

use clap::Parser;
use cli::{Cli, Commands};

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

pub fn run_with_cli(cli: Cli) -> Result<()> {
    let logger = Logger::with_overrides(cli.name.clone(), cli.overrides());
    dispatcher(&logger, cli.cmd)
}

fn dispatcher(logger: &Logger, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Debug(args) => logger.log(args.message.message()?, Method::Debug, args.options()),
        Commands::Info(args) => logger.log(args.message.message()?, Method::Info, args.options()),
        Commands::Warn(args) => {
            logger.log(args.message.message()?, Method::Warning, args.options())
        }
        Commands::Error(args) => logger.log(args.message.message()?, Method::Error, args.options()),
        Commands::Echo(args) => logger.echo(args.message()?),
        Commands::Profile(args) => logger.profile(args.message()?),
    }
}
