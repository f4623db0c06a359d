use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{LogError, Result};

/// Objects that know how to present themselves as structured data.
///
/// `Display` is used when pretty rendering is off.
pub trait Pretty: fmt::Display {
    fn pretty(&self) -> Value;
}

/// Anything the logger accepts as a message.
pub enum Message<'a> {
    Value(Value),
    Pretty(&'a dyn Pretty),
}

impl<'a> Message<'a> {
    pub fn none() -> Self {
        Message::Value(Value::Null)
    }

    pub fn pretty(object: &'a dyn Pretty) -> Self {
        Message::Pretty(object)
    }

    /// Captures any serializable value as structured data.
    pub fn serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        serde_json::to_value(value)
            .map(Message::Value)
            .map_err(|err| LogError::format(err.to_string()))
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Message::Pretty(_) => f.write_str("Pretty(..)"),
        }
    }
}

impl From<&str> for Message<'_> {
    fn from(text: &str) -> Self {
        Message::Value(Value::String(text.to_string()))
    }
}

impl From<String> for Message<'_> {
    fn from(text: String) -> Self {
        Message::Value(Value::String(text))
    }
}

impl From<&String> for Message<'_> {
    fn from(text: &String) -> Self {
        Message::Value(Value::String(text.clone()))
    }
}

impl From<Value> for Message<'_> {
    fn from(value: Value) -> Self {
        Message::Value(value)
    }
}

impl From<Vec<Value>> for Message<'_> {
    fn from(items: Vec<Value>) -> Self {
        Message::Value(Value::Array(items))
    }
}

impl From<Map<String, Value>> for Message<'_> {
    fn from(map: Map<String, Value>) -> Self {
        Message::Value(Value::Object(map))
    }
}

impl<'a> From<&'a dyn Pretty> for Message<'a> {
    fn from(object: &'a dyn Pretty) -> Self {
        Message::Pretty(object)
    }
}

impl<'a, T: Pretty> From<&'a T> for Message<'a> {
    fn from(object: &'a T) -> Self {
        Message::Pretty(object)
    }
}

impl<'a, T: Into<Message<'a>>> From<Option<T>> for Message<'a> {
    fn from(message: Option<T>) -> Self {
        message.map(Into::into).unwrap_or_else(Message::none)
    }
}

macro_rules! scalar_message {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Message<'_> {
                fn from(value: $ty) -> Self {
                    Message::Value(Value::from(value))
                }
            }
        )*
    };
}

scalar_message!(bool, i32, i64, u32, u64, usize);

/// JSON has no NaN or infinity, so those keep their textual form.
impl From<f64> for Message<'_> {
    fn from(value: f64) -> Self {
        if value.is_finite() {
            Message::Value(Value::from(value))
        } else {
            Message::Value(Value::String(value.to_string()))
        }
    }
}
