use std::fs;

use prettylog::printer::SharedBuffer;
use prettylog::{registry, ConfigOverrides, Level, Logger};
use tempfile::tempdir;

fn joined_logger(dir: &std::path::Path, name: &str) -> Logger {
    Logger::with_overrides(
        name,
        ConfigOverrides::new()
            .dir(dir)
            .level("info")
            .join_root(true),
    )
    .with_console(SharedBuffer::new())
}

#[test]
fn root_attachment_happens_once() {
    let dir = tempdir().expect("create temp dir");
    let logger = joined_logger(dir.path(), "join-once");

    logger.setup().unwrap();
    logger.setup().unwrap();
    logger.info("after setup").unwrap();

    let path = logger.log_file().unwrap();
    assert_eq!(registry::root().handlers_for(&path), 1);
    assert_eq!(registry::scope("join-once").handlers_for(&path), 1);
}

#[test]
fn same_name_loggers_share_one_handler_and_level() {
    let dir = tempdir().expect("create temp dir");
    let first = joined_logger(dir.path(), "join-shared");
    let second = joined_logger(dir.path(), "join-shared");
    first.setup().unwrap();
    second.setup().unwrap();

    first.warning("only once").unwrap();

    let path = first.log_file().unwrap();
    assert_eq!(second.log_file().unwrap(), path);
    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.matches("only once").count(), 1);
    assert_eq!(registry::scope("join-shared").handlers_for(&path), 1);
    assert_eq!(registry::root().handlers_for(&path), 1);

    second.set_level(Level::Error).unwrap();
    assert_eq!(first.level().unwrap(), Level::Error);
}

#[test]
fn log_facade_records_land_in_the_file() {
    let dir = tempdir().expect("create temp dir");
    let logger = joined_logger(dir.path(), "join-facade");
    logger.setup().unwrap();

    log::warn!("captured from elsewhere");
    log::error!("also captured");

    let content = fs::read_to_string(logger.log_file().unwrap()).unwrap();
    assert!(content.contains(" - WARN - captured from elsewhere"));
    assert!(content.contains(" - ERROR - also captured"));
}

#[test]
fn own_records_are_not_duplicated_through_root() {
    let dir = tempdir().expect("create temp dir");
    let logger = joined_logger(dir.path(), "join-no-dup");

    logger.info("written once").unwrap();

    let content = fs::read_to_string(logger.log_file().unwrap()).unwrap();
    assert_eq!(content.matches("written once").count(), 1);
}

#[test]
fn propagating_scopes_reach_root_handlers() {
    let dir = tempdir().expect("create temp dir");
    let logger = joined_logger(dir.path(), "join-propagation");
    logger.setup().unwrap();

    let other = registry::scope("join-propagation-child");
    assert!(other.propagate());
    other.set_level(Level::Info);
    other.emit(Level::Info, "from a child scope").unwrap();
    other.emit(Level::Debug, "below the child level").unwrap();

    let content = fs::read_to_string(logger.log_file().unwrap()).unwrap();
    assert!(content.contains("from a child scope"));
    assert!(!content.contains("below the child level"));
}
