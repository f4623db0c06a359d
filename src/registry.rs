use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once, OnceLock, PoisonError, RwLock};

use env_logger::{Builder, Env, Target};
use indexmap::IndexMap;
use log::Level;

use crate::error::Result;
use crate::format::timestamp;
use crate::handler::RotatingFileHandler;
use crate::level::passes;
use crate::logger::{debug, trace};

/// Name of the scope that receives records from the `log` facade.
pub const ROOT: &str = "root";

/// A named logging scope: a minimum severity, a set of file handlers and a
/// flag telling whether accepted records also reach the root scope handlers.
#[derive(Debug)]
pub struct Scope {
    name: String,
    level: RwLock<Level>,
    propagate: AtomicBool,
    handlers: RwLock<Vec<Arc<RotatingFileHandler>>>,
}

impl Scope {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            level: RwLock::new(Level::Warn),
            propagate: AtomicBool::new(name != ROOT),
            handlers: RwLock::new(Vec::new()),
        }
    }

    pub fn level(&self) -> Level {
        *self.level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_level(&self, level: Level) {
        *self.level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    pub fn propagate(&self) -> bool {
        self.propagate.load(Ordering::Relaxed)
    }

    pub fn set_propagate(&self, propagate: bool) {
        self.propagate
            .store(propagate && self.name != ROOT, Ordering::Relaxed);
    }

    /// Adds `handler` unless this exact handler is already attached.
    /// Returns whether it was added.
    pub fn attach(&self, handler: Arc<RotatingFileHandler>) -> bool {
        let added = {
            let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
            if handlers.iter().any(|existing| Arc::ptr_eq(existing, &handler)) {
                false
            } else {
                handlers.push(handler.clone());
                true
            }
        };
        // Must run unlocked: the root bridge writes through these handlers.
        trace!(
            "scope '{}': attach {} -> {}",
            self.name,
            handler.path().display(),
            if added { "added" } else { "already attached" }
        );
        added
    }

    /// Returns the handler already writing to `path`, or attaches the one
    /// built by `open`. Loggers sharing a name and a file share one handler.
    pub fn handler_or_attach<F>(&self, path: &Path, open: F) -> Result<Arc<RotatingFileHandler>>
    where
        F: FnOnce() -> Result<RotatingFileHandler>,
    {
        let (handler, reused) = {
            let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
            match handlers.iter().find(|existing| existing.path() == path) {
                Some(existing) => (existing.clone(), true),
                None => {
                    let handler = Arc::new(open()?);
                    handlers.push(handler.clone());
                    (handler, false)
                }
            }
        };
        trace!(
            "scope '{}': {} handler for {}",
            self.name,
            if reused { "reusing" } else { "opened" },
            path.display()
        );
        Ok(handler)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of attached handlers writing to `path`.
    pub fn handlers_for(&self, path: &Path) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|handler| handler.path() == path)
            .count()
    }

    /// Persists `text` when `level` passes this scope's threshold, then hands
    /// it to the root scope handlers if propagation is on.
    pub fn emit(&self, level: Level, text: &str) -> Result<()> {
        if !passes(level, self.level()) {
            return Ok(());
        }
        self.write_handlers(text)?;
        if self.propagate() {
            root().write_handlers(text)?;
        }
        Ok(())
    }

    fn write_handlers(&self, text: &str) -> Result<()> {
        let handlers = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for handler in handlers {
            handler.write_line(text)?;
        }
        Ok(())
    }
}

fn scopes() -> &'static Mutex<IndexMap<String, Arc<Scope>>> {
    static SCOPES: OnceLock<Mutex<IndexMap<String, Arc<Scope>>>> = OnceLock::new();
    SCOPES.get_or_init(|| {
        let mut map = IndexMap::new();
        map.insert(ROOT.to_string(), Arc::new(Scope::new(ROOT)));
        Mutex::new(map)
    })
}

/// Returns the scope registered under `name`, creating it on first use.
pub fn scope(name: &str) -> Arc<Scope> {
    let mut scopes = scopes().lock().unwrap_or_else(PoisonError::into_inner);
    scopes
        .entry(name.to_string())
        .or_insert_with(|| Arc::new(Scope::new(name)))
        .clone()
}

pub fn root() -> Arc<Scope> {
    scope(ROOT)
}

/// Scope names in registration order, root first.
pub fn scope_names() -> Vec<String> {
    scopes()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .cloned()
        .collect()
}

/// Routes records from the `log` facade into the root scope handlers.
///
/// The filter comes from `RUST_LOG` and defaults to `warn`. When another
/// global logger is already installed the bridge is skipped.
pub fn install_root_bridge() {
    static BRIDGE: Once = Once::new();
    BRIDGE.call_once(|| {
        let env = Env::default().default_filter_or("warn");
        let mut builder = Builder::from_env(env);

        builder
            .target(Target::Pipe(Box::new(RootPipe)))
            .format(|buf, record| {
                writeln!(buf, "{} - {} - {}", timestamp(), record.level(), record.args())
            });

        if builder.try_init().is_err() {
            debug!("global logger already initialized, root bridge not installed");
        }
    });
}

struct RootPipe;

impl Write for RootPipe {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(buf);
        let line = text.trim_end_matches(['\r', '\n']);
        if !line.is_empty() {
            root().write_handlers(line).map_err(io::Error::other)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
