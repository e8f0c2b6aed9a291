use std::fmt;

use wiremux_value::{Record, Value};

/// Record field marking a transported error.
pub const ERROR_MARKER: &str = "$error";

const FIELD_NAME: &str = "name";
const FIELD_MESSAGE: &str = "message";
const FIELD_STACK: &str = "stack";

/// A structured error carried inside a ReplyError frame.
///
/// On the wire this is a record with the [`ERROR_MARKER`] flag plus `name`,
/// `message` and `stack` strings; anything without the marker stays an
/// opaque value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub name: String,
    pub message: String,
    pub stack: String,
}

impl RemoteError {
    /// Build an error with an empty stack.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: String::new(),
        }
    }

    /// The marker-record wire shape of this error.
    pub fn to_value(&self) -> Value {
        let mut fields = Record::new();
        fields.insert(ERROR_MARKER.to_string(), Value::Bool(true));
        fields.insert(FIELD_NAME.to_string(), Value::String(self.name.clone()));
        fields.insert(
            FIELD_MESSAGE.to_string(),
            Value::String(self.message.clone()),
        );
        fields.insert(FIELD_STACK.to_string(), Value::String(self.stack.clone()));
        Value::Record(fields)
    }

    /// Rehydrate from a marker record. `None` when the marker is missing.
    ///
    /// Missing name/message/stack fields decode as empty strings; only the
    /// marker itself is required.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_record()?;
        match fields.get(ERROR_MARKER) {
            Some(Value::Bool(true)) => {}
            _ => return None,
        }

        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            name: text(FIELD_NAME),
            message: text(FIELD_MESSAGE),
            stack: text(FIELD_STACK),
        })
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.name, self.message)
        }
    }
}

impl std::error::Error for RemoteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_through_marker_record() {
        let err = RemoteError {
            name: "TypeError".to_string(),
            message: "x is not a function".to_string(),
            stack: "at main (app:1:1)".to_string(),
        };
        let rehydrated = RemoteError::from_value(&err.to_value()).unwrap();
        assert_eq!(rehydrated, err);
    }

    #[test]
    fn unmarked_record_is_not_an_error() {
        let mut fields = Record::new();
        fields.insert("name".to_string(), "E".into());
        assert!(RemoteError::from_value(&Value::Record(fields)).is_none());
        assert!(RemoteError::from_value(&Value::Null).is_none());
    }

    #[test]
    fn marker_must_be_true() {
        let mut fields = Record::new();
        fields.insert(ERROR_MARKER.to_string(), Value::Bool(false));
        assert!(RemoteError::from_value(&Value::Record(fields)).is_none());
    }

    #[test]
    fn missing_fields_decode_empty() {
        let mut fields = Record::new();
        fields.insert(ERROR_MARKER.to_string(), Value::Bool(true));
        let err = RemoteError::from_value(&Value::Record(fields)).unwrap();
        assert_eq!(err.name, "");
        assert_eq!(err.message, "");
        assert_eq!(err.stack, "");
    }

    #[test]
    fn display_formats() {
        assert_eq!(
            RemoteError::new("E", "boom").to_string(),
            "E: boom"
        );
        assert_eq!(RemoteError::new("", "boom").to_string(), "boom");
    }
}
