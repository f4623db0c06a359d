mod cleaner;
mod message;

pub use cleaner::StructCleaner;
pub use message::{Message, Pretty};

use std::fmt::Write as _;

use chrono::Local;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::error::{LogError, Result};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const CLEANER_DEPTH: usize = 3;
const LIST_INDENT: &[u8] = b"    ";

pub fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Renders `message` for the sink and the console.
///
/// With `pretty` on, lists become indented JSON and mappings become a YAML
/// document with sorted keys; neither gets a tag. Everything else is turned
/// into a single line, prefixed with `<timestamp> - <tag> - ` when a tag is
/// given.
pub fn render(
    message: Message<'_>,
    pretty: bool,
    cleaner: &StructCleaner,
    tag: Option<&str>,
) -> Result<String> {
    if !pretty {
        return coerce(message).map(|text| with_tag(text, tag));
    }

    let value = match message {
        Message::Value(Value::Array(items)) => return render_list(&items),
        Message::Value(value) => value,
        Message::Pretty(object) => object.pretty(),
    };

    match value {
        Value::Object(map) => render_mapping(cleaner.clean_map(map)),
        scalar => Ok(with_tag(coerce_value(&scalar), tag)),
    }
}

fn with_tag(text: String, tag: Option<&str>) -> String {
    match tag {
        Some(tag) if !tag.is_empty() => format!("{} - {} - {}", timestamp(), tag, text),
        _ => text,
    }
}

fn coerce(message: Message<'_>) -> Result<String> {
    match message {
        Message::Value(value) => Ok(coerce_value(&value)),
        Message::Pretty(object) => {
            let mut text = String::new();
            write!(text, "{}", object)
                .map_err(|_| LogError::format("Display implementation returned an error"))?;
            Ok(text)
        }
    }
}

fn coerce_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn render_list(items: &[Value]) -> Result<String> {
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(LIST_INDENT));
    items
        .serialize(&mut serializer)
        .map_err(|err| LogError::format(err.to_string()))?;
    String::from_utf8(out).map_err(|err| LogError::format(err.to_string()))
}

fn render_mapping(map: Map<String, Value>) -> Result<String> {
    let ordered = canonical_order(Value::Object(map));
    let yaml = serde_yaml::to_string(&ordered).map_err(|err| LogError::format(err.to_string()))?;
    Ok(format!("---\n{}", yaml.trim_end()))
}

/// Sorts mapping keys at every level so equal inputs render identically.
fn canonical_order(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(left, _), (right, _)| left.cmp(right));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, canonical_order(value)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical_order).collect()),
        other => other,
    }
}
