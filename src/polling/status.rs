//! Boundary normalization of status bodies.
//!
//! Status endpoints answer either with a bare object or with a list holding
//! the object. Everything past this point sees the object.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    body: Value,
}

impl StatusRecord {
    /// Unwrap the first element when the body is a non-empty list. An empty
    /// list is kept as-is; it carries neither a status nor any field.
    pub fn normalize(raw: Value) -> Self {
        let body = match raw {
            Value::Array(items) if !items.is_empty() => {
                items.into_iter().next().unwrap_or(Value::Null)
            }
            other => other,
        };
        Self { body }
    }

    /// The `status` field, when present as a string.
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(Value::as_str)
    }

    /// Look up a field by JSON pointer (`/a/0/b`).
    pub fn field(&self, pointer: &str) -> Option<&Value> {
        self.body.pointer(pointer)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn into_body(self) -> Value {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_element_list_equals_bare_object() {
        let object = json!({ "status": "PROCESSING", "streamId": "s-1" });
        let wrapped = json!([{ "status": "PROCESSING", "streamId": "s-1" }]);
        assert_eq!(
            StatusRecord::normalize(object),
            StatusRecord::normalize(wrapped)
        );
    }

    #[test]
    fn first_element_is_canonical() {
        let record = StatusRecord::normalize(json!([
            { "status": "COMPLETED" },
            { "status": "FAILED" }
        ]));
        assert_eq!(record.status(), Some("COMPLETED"));
    }

    #[test]
    fn missing_or_non_string_status_is_none() {
        assert_eq!(StatusRecord::normalize(json!({})).status(), None);
        assert_eq!(StatusRecord::normalize(json!({ "status": 500 })).status(), None);
        assert_eq!(StatusRecord::normalize(json!([])).status(), None);
    }

    #[test]
    fn field_follows_pointer_into_containers() {
        let record = StatusRecord::normalize(json!([{
            "recordingProcessContainers": [{ "streamId": "abc-123" }]
        }]));
        assert_eq!(
            record.field("/recordingProcessContainers/0/streamId"),
            Some(&json!("abc-123"))
        );
    }
}
