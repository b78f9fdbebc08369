//! Message envelopes for the mapstore method channel.
//!
//! One JSON object per line in each direction. A request names a method and
//! carries a loosely typed argument bag; each request produces exactly one
//! reply: a success value, a tagged error, or a `notImplemented` marker for
//! unrecognized methods (which is deliberately not an error).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An incoming method call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    /// String-keyed argument bag; `null` when the caller sent none.
    #[serde(default)]
    pub args: Value,
    /// Correlation id, echoed verbatim in the reply.
    #[serde(default)]
    pub id: Value,
}

/// A successful reply carrying the operation's result value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessReply {
    pub id: Value,
    pub result: Value,
}

impl SuccessReply {
    pub fn new(id: Value, result: Value) -> Self {
        Self { id, result }
    }
}

/// An error reply with a stable code and a human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReply {
    pub id: Value,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorReply {
    pub fn new(id: Value, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}

/// The reply for an unrecognized method name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotImplementedReply {
    pub id: Value,
    #[serde(rename = "notImplemented")]
    pub not_implemented: bool,
}

impl NotImplementedReply {
    pub fn new(id: Value) -> Self {
        Self {
            id,
            not_implemented: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_call() {
        let line = r#"{"method":"readMapFile","args":{"uriString":"doc://a","offset":2,"length":5},"id":7}"#;
        let call: MethodCall = serde_json::from_str(line).unwrap();
        assert_eq!(call.method, "readMapFile");
        assert_eq!(call.id, json!(7));
        assert_eq!(call.args["uriString"], "doc://a");
        assert_eq!(call.args["offset"], 2);
    }

    #[test]
    fn deserialize_call_without_args() {
        let line = r#"{"method":"askPermission","id":"req-1"}"#;
        let call: MethodCall = serde_json::from_str(line).unwrap();
        assert_eq!(call.method, "askPermission");
        assert!(call.args.is_null());
        assert_eq!(call.id, json!("req-1"));
    }

    #[test]
    fn serialize_success_reply() {
        let reply = SuccessReply::new(json!(1), json!(true));
        let v: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["id"], 1);
        assert_eq!(v["result"], true);
        assert!(v.get("error").is_none());
    }

    #[test]
    fn serialize_error_reply() {
        let reply = ErrorReply::new(json!(2), "ArgumentException", "Invalid argument");
        let v: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["error"]["code"], "ArgumentException");
        assert_eq!(v["error"]["message"], "Invalid argument");
        assert_eq!(v["id"], 2);
    }

    #[test]
    fn serialize_not_implemented_reply() {
        let reply = NotImplementedReply::new(json!(3));
        let v: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["notImplemented"], true);
        assert!(v.get("result").is_none());
        assert!(v.get("error").is_none());
    }

    #[test]
    fn reply_preserves_id_types() {
        let reply = SuccessReply::new(json!("abc"), json!(null));
        let v: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["id"], "abc");

        let reply = SuccessReply::new(json!(42), json!(null));
        let v: Value = serde_json::to_value(&reply).unwrap();
        assert_eq!(v["id"], 42);
    }
}
