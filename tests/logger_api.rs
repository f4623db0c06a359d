use std::fmt;
use std::fs;
use std::io::Write;

use prettylog::printer::SharedBuffer;
use prettylog::{registry, ConfigOverrides, Level, LogError, LogOptions, Logger, Message, Method, Pretty};
use serde::Serialize;
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};

fn logger_in(dir: &TempDir, name: &str, overrides: ConfigOverrides) -> (Logger, SharedBuffer) {
    let console = SharedBuffer::new();
    let overrides = ConfigOverrides {
        dir: Some(dir.path().to_path_buf()),
        ..overrides
    };
    let logger = Logger::with_overrides(name, overrides).with_console(console.clone());
    (logger, console)
}

struct Experiment {
    id: u32,
    tags: Vec<&'static str>,
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Experiment #{}", self.id)
    }
}

impl Pretty for Experiment {
    fn pretty(&self) -> Value {
        json!({"id": self.id, "tags": self.tags, "owner": null})
    }
}

#[test]
fn pretty_objects_render_through_their_pretty_form() {
    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-pretty-object", ConfigOverrides::new().pretty(true));
    let experiment = Experiment {
        id: 7,
        tags: vec!["nightly"],
    };

    logger.info(Message::pretty(&experiment)).unwrap();

    assert_eq!(console.contents(), "---\nid: 7\ntags:\n- nightly\n");
}

#[test]
fn pretty_objects_are_accepted_by_reference() {
    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-pretty-ref", ConfigOverrides::new().pretty(true));
    let experiment = Experiment {
        id: 8,
        tags: vec!["weekly"],
    };

    logger.info(&experiment).unwrap();

    assert_eq!(console.contents(), "---\nid: 8\ntags:\n- weekly\n");
}

#[test]
fn pretty_objects_use_display_when_plain() {
    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-plain-object", ConfigOverrides::new());
    let experiment = Experiment {
        id: 7,
        tags: vec![],
    };

    logger
        .log(Message::pretty(&experiment), Method::Info, LogOptions::new().without_tag())
        .unwrap();

    assert_eq!(console.contents(), "Experiment #7\n");
}

#[test]
fn serializable_values_are_logged_as_structures() {
    #[derive(Serialize)]
    struct Deployment {
        name: String,
        replicas: u8,
    }

    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-serialize", ConfigOverrides::new());
    let deployment = Deployment {
        name: "api".to_string(),
        replicas: 2,
    };

    logger.echo(Message::serialize(&deployment).unwrap()).unwrap();

    assert_eq!(console.contents(), "---\nname: api\nreplicas: 2\n");
}

#[test]
fn file_and_console_hold_the_same_text() {
    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-same-text", ConfigOverrides::new().level("debug"));

    logger.debug("one").unwrap();
    logger.info(json!({"plain": true})).unwrap();
    logger.error("three").unwrap();

    let file = fs::read_to_string(logger.log_file().unwrap()).unwrap();
    assert_eq!(file, console.contents());
    assert_eq!(file.lines().count(), 3);
}

#[test]
fn level_changes_apply_to_later_calls() {
    let dir = tempdir().expect("create temp dir");
    let (logger, console) = logger_in(&dir, "api-level-change", ConfigOverrides::new().level("error"));

    logger.warning("before").unwrap();
    logger.set_level(Level::Warn).unwrap();
    logger.warning("after").unwrap();

    let printed = console.contents();
    assert!(!printed.contains("before"));
    assert!(printed.contains("WARN - after"));
    assert_eq!(logger.level().unwrap(), Level::Warn);
    assert!(!logger.debug_mode().unwrap());
}

#[test]
fn repeated_setup_registers_one_handler() {
    let dir = tempdir().expect("create temp dir");
    let (logger, _console) = logger_in(&dir, "api-one-handler", ConfigOverrides::new());

    for _ in 0..5 {
        logger.setup().unwrap();
    }
    logger.info("x").unwrap();

    let scope = registry::scope("api-one-handler");
    assert_eq!(scope.handler_count(), 1);
    assert_eq!(scope.handlers_for(&logger.log_file().unwrap()), 1);
}

#[test]
fn small_max_bytes_rotates_through_the_logger() {
    let dir = tempdir().expect("create temp dir");
    let (logger, _console) = logger_in(
        &dir,
        "api-rotation",
        ConfigOverrides::new().max_bytes(64).backup_count(2).file_name("rot.log"),
    );

    for index in 0..10 {
        logger
            .log(
                format!("record number {:02} padded out", index),
                Method::Info,
                LogOptions::new().without_tag(),
            )
            .unwrap();
    }

    let current = dir.path().join("rot.log");
    assert!(current.is_file());
    assert!(dir.path().join("rot.log.1").is_file());
    assert!(dir.path().join("rot.log.2").is_file());
    assert!(!dir.path().join("rot.log.3").exists());
    assert!(fs::read_to_string(current).unwrap().contains("record number 09"));
}

#[test]
fn config_file_supplies_settings() {
    let dir = tempdir().expect("create temp dir");
    let config_path = dir.path().join("logging.yaml");
    let mut file = fs::File::create(&config_path).expect("create config");
    writeln!(
        file,
        "service: other-section-is-ignored\nlogger:\n  level: warning\n  pretty: true\n  file_name: from-config.log"
    )
    .expect("write config");

    let (logger, console) = logger_in(
        &dir,
        "api-config-file",
        ConfigOverrides::new().config_file(&config_path),
    );

    logger.info("not shown").unwrap();
    logger.warning(json!({"k": "v"})).unwrap();

    assert_eq!(logger.level().unwrap(), Level::Warn);
    assert_eq!(logger.log_file(), Some(dir.path().join("from-config.log")));
    assert_eq!(console.contents(), "---\nk: v\n");
}

#[test]
fn invalid_config_is_reported_on_first_use() {
    let dir = tempdir().expect("create temp dir");
    let (logger, _console) = logger_in(&dir, "api-bad-config", ConfigOverrides::new().level("shouty"));

    let err = logger.info("x").unwrap_err();
    assert!(matches!(err, LogError::Config(_)));
    assert!(!logger.is_setup());
}
