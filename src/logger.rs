use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::Level;

use crate::config::{ConfigOverrides, LoggerConfig};
use crate::error::{LogError, Result};
use crate::format::{render, Message, StructCleaner, CLEANER_DEPTH};
use crate::handler::RotatingFileHandler;
use crate::level::{passes, Method};
use crate::printer::Console;
use crate::registry::{self, Scope};

pub const DEFAULT_NAME: &str = "prettylog";
pub const PROFILE_TAG: &str = "PROFILE";

/// Process-wide logger named [`DEFAULT_NAME`].
///
/// Built on first access and never torn down. Nothing touches the filesystem
/// until the first logging call (or an explicit [`Logger::setup`]).
pub fn global() -> &'static Logger {
    static GLOBAL: OnceLock<Logger> = OnceLock::new();
    GLOBAL.get_or_init(|| Logger::new(DEFAULT_NAME))
}

/// Per-call switches for [`Logger::log`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub force_pretty: bool,
    pub force_print: bool,
    pub use_tag: bool,
    pub tag: Option<String>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            force_pretty: false,
            force_print: false,
            use_tag: true,
            tag: None,
        }
    }
}

impl LogOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_pretty(mut self) -> Self {
        self.force_pretty = true;
        self
    }

    pub fn force_print(mut self) -> Self {
        self.force_print = true;
        self
    }

    pub fn without_tag(mut self) -> Self {
        self.use_tag = false;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    fn resolve_tag(&self, method: Method) -> Option<&str> {
        if !self.use_tag {
            return None;
        }
        match self.tag.as_deref() {
            Some(tag) if !tag.is_empty() => Some(tag),
            _ => Some(method.tag()),
        }
    }
}

#[derive(Debug, Clone)]
struct Sink {
    scope: Arc<Scope>,
    handler: Arc<RotatingFileHandler>,
}

/// Logger writing every record to a rotating file and echoing the ones that
/// pass its level to the console.
///
/// Loggers created with the same name share one scope: they see the same
/// level, and when they resolve to the same file they also share its handler,
/// so each record is written once.
#[derive(Debug)]
pub struct Logger {
    name: String,
    overrides: ConfigOverrides,
    cleaner: StructCleaner,
    console: Console,
    pretty: AtomicBool,
    sink: Mutex<Option<Sink>>,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_overrides(name, ConfigOverrides::default())
    }

    pub fn with_overrides(name: impl Into<String>, overrides: ConfigOverrides) -> Self {
        Self {
            name: name.into(),
            overrides,
            cleaner: StructCleaner::new(CLEANER_DEPTH),
            console: Console::stdout(),
            pretty: AtomicBool::new(false),
            sink: Mutex::new(None),
        }
    }

    /// Replaces standard output as the console destination.
    pub fn with_console(mut self, target: impl Write + Send + 'static) -> Self {
        self.console = Console::new(target);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_setup(&self) -> bool {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn is_pretty(&self) -> bool {
        self.pretty.load(Ordering::Relaxed)
    }

    /// Path of the log file, once set up.
    pub fn log_file(&self) -> Option<PathBuf> {
        self.sink
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|sink| sink.handler.path().to_path_buf())
    }

    /// Creates the sink on first call; later calls return immediately.
    pub fn setup(&self) -> Result<&Self> {
        self.ready().map(|_| self)
    }

    fn ready(&self) -> Result<Sink> {
        let mut slot = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sink) = slot.as_ref() {
            return Ok(sink.clone());
        }

        let config = LoggerConfig::resolve(&self.name, &self.overrides)?;
        let sink = self.open_sink(&config)?;
        *slot = Some(sink.clone());
        drop(slot);

        debug!(
            "logger '{}' writing to {} (level={}, pretty={}, join_root={})",
            self.name,
            sink.handler.path().display(),
            config.level,
            config.pretty,
            config.join_root
        );
        Ok(sink)
    }

    fn open_sink(&self, config: &LoggerConfig) -> Result<Sink> {
        ensure_dir(&config.dir)?;
        let path = config.file_path();

        let scope = registry::scope(&self.name);
        let handler = scope.handler_or_attach(&path, || {
            RotatingFileHandler::open(&path, config.max_bytes, config.backup_count)
        })?;
        scope.set_level(config.level);
        scope.set_propagate(false);
        self.pretty.store(config.pretty, Ordering::Relaxed);

        if config.join_root {
            registry::root().attach(handler.clone());
            registry::install_root_bridge();
        }

        Ok(Sink { scope, handler })
    }

    pub fn level(&self) -> Result<Level> {
        Ok(self.ready()?.scope.level())
    }

    pub fn set_level(&self, level: Level) -> Result<()> {
        self.ready()?.scope.set_level(level);
        Ok(())
    }

    pub fn debug_mode(&self) -> Result<bool> {
        Ok(self.level()? == Level::Debug)
    }

    /// `true` switches to debug; `false` returns to info, but only when the
    /// logger is currently in debug mode.
    pub fn set_debug_mode(&self, debug_mode: bool) -> Result<()> {
        if debug_mode {
            self.set_level(Level::Debug)
        } else if self.debug_mode()? {
            self.set_level(Level::Info)
        } else {
            Ok(())
        }
    }

    /// Renders `message`, hands it to the sink at the severity of `method`
    /// and prints it when that severity passes the current level or
    /// `force_print` is set.
    pub fn log<'a>(
        &self,
        message: impl Into<Message<'a>>,
        method: Method,
        options: LogOptions,
    ) -> Result<()> {
        let sink = self.ready()?;
        let level = method.level();
        let tag = options.resolve_tag(method);

        let text = self.format(message, options.force_pretty, tag)?;
        sink.scope.emit(level, &text)?;

        if passes(level, sink.scope.level()) || options.force_print {
            self.console.print(&text);
        }
        Ok(())
    }

    pub fn debug<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        self.log(message, Method::Debug, LogOptions::default())
    }

    pub fn info<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        self.log(message, Method::Info, LogOptions::default())
    }

    #[deprecated(note = "use `warning` instead")]
    pub fn warn<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        self.log(message, Method::Warn, LogOptions::default())
    }

    pub fn warning<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        self.log(message, Method::Warning, LogOptions::default())
    }

    pub fn error<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        self.log(message, Method::Error, LogOptions::default())
    }

    /// User-facing output: always printed, never tagged, logged at info.
    pub fn echo<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        let options = LogOptions::new().force_pretty().force_print().without_tag();
        self.log(message, Method::Info, options)
    }

    /// Timing and trace notes, logged at debug under the `PROFILE` tag.
    pub fn profile<'a>(&self, message: impl Into<Message<'a>>) -> Result<()> {
        let options = LogOptions::new().force_pretty().tag(PROFILE_TAG);
        self.log(message, Method::Debug, options)
    }

    /// Renders `message` as [`Logger::log`] would, without emitting it.
    pub fn format<'a>(
        &self,
        message: impl Into<Message<'a>>,
        force_pretty: bool,
        tag: Option<&str>,
    ) -> Result<String> {
        let pretty = self.is_pretty() || force_pretty;
        render(message.into(), pretty, &self.cleaner, tag)
    }
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|err| LogError::io(dir, err))
}

/// Re-export logging macros
#[allow(unused_imports)]
pub use log::{debug, error, info, trace, warn};
