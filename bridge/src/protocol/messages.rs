//! Method-channel message types for the mapstore bridge.

pub use mapstore_core::protocol::messages::*;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_call_with_byte_payload() {
        let line = r#"{"method":"writeMapFile","args":{"uriString":"doc://map.bin","data":"AAECAw=="},"id":3}"#;
        let call: MethodCall = serde_json::from_str(line).unwrap();
        assert_eq!(call.method, "writeMapFile");
        assert_eq!(call.args["data"], "AAECAw==");
    }

    #[test]
    fn null_result_is_a_success() {
        // A cancelled permission request replies success with a null value.
        let reply = SuccessReply::new(json!(4), json!(null));
        let v = serde_json::to_value(&reply).unwrap();
        assert!(v["result"].is_null());
        assert!(v.get("error").is_none());
    }

    #[test]
    fn missing_id_defaults_to_null() {
        let call: MethodCall =
            serde_json::from_str(r#"{"method":"existsMap","args":{}}"#).unwrap();
        assert!(call.id.is_null());
    }
}
