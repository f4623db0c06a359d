use serde_json::{Map, Value};

/// Depth-bounded sanitizer for structured messages.
///
/// Within the bound, null entries are dropped from mappings and lists.
/// Non-empty containers found at `depth` levels below the top are replaced by
/// a short summary such as `{...} (2 keys)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructCleaner {
    depth: usize,
}

impl StructCleaner {
    pub fn new(depth: usize) -> Self {
        Self { depth }
    }

    pub fn clean(&self, value: Value) -> Value {
        self.clean_at(value, 0)
    }

    pub fn clean_map(&self, map: Map<String, Value>) -> Map<String, Value> {
        match self.clean(Value::Object(map)) {
            Value::Object(map) => map,
            // depth 0 summarizes the top level itself
            other => Map::from_iter([("summary".to_string(), other)]),
        }
    }

    fn clean_at(&self, value: Value, level: usize) -> Value {
        if level >= self.depth {
            return summarize(value);
        }
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .filter(|(_, value)| !value.is_null())
                    .map(|(key, value)| (key, self.clean_at(value, level + 1)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .filter(|value| !value.is_null())
                    .map(|value| self.clean_at(value, level + 1))
                    .collect(),
            ),
            other => other,
        }
    }
}

fn summarize(value: Value) -> Value {
    match value {
        Value::Object(map) if !map.is_empty() => {
            Value::String(format!("{{...}} ({})", plural(map.len(), "key")))
        }
        Value::Array(items) if !items.is_empty() => {
            Value::String(format!("[...] ({})", plural(items.len(), "item")))
        }
        other => other,
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shallow_structures_only_lose_nulls() {
        let cleaner = StructCleaner::new(3);
        let cleaned = cleaner.clean(json!({"a": 1, "b": null, "c": [1, null, 2]}));
        assert_eq!(cleaned, json!({"a": 1, "c": [1, 2]}));
    }

    #[test]
    fn containers_past_the_bound_are_summarized() {
        let cleaner = StructCleaner::new(3);
        let raw = json!({"l1": {"l2": {"l3": {"l4": 1, "other": 2}}, "list": [[1, 2, 3]]}});
        let cleaned = cleaner.clean(raw);
        assert_eq!(
            cleaned,
            json!({"l1": {"l2": {"l3": "{...} (2 keys)"}, "list": ["[...] (3 items)"]}})
        );
    }

    #[test]
    fn empty_containers_past_the_bound_are_kept() {
        let cleaner = StructCleaner::new(1);
        let cleaned = cleaner.clean(json!({"empty": {}, "full": {"x": 1}}));
        assert_eq!(cleaned, json!({"empty": {}, "full": "{...} (1 key)"}));
    }

    #[test]
    fn scalars_past_the_bound_are_untouched() {
        let cleaner = StructCleaner::new(1);
        let cleaned = cleaner.clean(json!({"a": "text", "b": null}));
        assert_eq!(cleaned, json!({"a": "text"}));
    }
}
