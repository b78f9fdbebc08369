//! Method-call dispatcher for the mapstore bridge.
//!
//! Routes each incoming call to exactly one handler and guarantees exactly
//! one reply, including for permission requests that only resolve once the
//! user's picker decision arrives. Every operation is a single host call
//! through the [`DocumentStore`]; nothing is queued or retried.

use std::sync::Arc;

use base64::Engine;
use serde_json::{json, Value};
use tracing::{debug, warn};

use mapstore_core::errors::StorageError;
use mapstore_core::grants::{DocumentPicker, GrantBroker, GrantOutcome, PickerRequest};
use mapstore_core::permissions::PermissionRegistry;
use mapstore_core::resource::{AccessKind, ResourceId};
use mapstore_core::store::DocumentStore;

use crate::protocol::errors;
use crate::protocol::messages::{ErrorReply, MethodCall, NotImplementedReply, SuccessReply};
use crate::protocol::methods::{AskPermissionParams, ReadParams, UriParams, WriteParams};

/// The result of dispatching one call.
pub enum DispatchResult {
    Success(SuccessReply),
    Error(ErrorReply),
    NotImplemented(NotImplementedReply),
}

impl DispatchResult {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(reply) => serde_json::to_value(reply).unwrap(),
            Self::Error(reply) => serde_json::to_value(reply).unwrap(),
            Self::NotImplemented(reply) => serde_json::to_value(reply).unwrap(),
        }
    }
}

/// Routes method calls to the store, registry, and picker.
///
/// Cheap to clone behind `Arc`s; the stdio loop serves each request on its
/// own task so a pending grant cannot stall other calls.
pub struct Dispatcher {
    store: Arc<dyn DocumentStore>,
    registry: Arc<dyn PermissionRegistry>,
    picker: Arc<dyn DocumentPicker>,
    broker: GrantBroker,
}

impl Dispatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        registry: Arc<dyn PermissionRegistry>,
        picker: Arc<dyn DocumentPicker>,
        broker: GrantBroker,
    ) -> Self {
        Self {
            store,
            registry,
            picker,
            broker,
        }
    }

    /// Dispatch one call to its handler, producing exactly one reply.
    pub async fn dispatch(&self, call: MethodCall) -> DispatchResult {
        let id = call.id.clone();
        let method = call.method.as_str();
        // An absent argument bag behaves like an empty one.
        let args = if call.args.is_null() {
            json!({})
        } else {
            call.args.clone()
        };

        debug!("Dispatching method: {}", method);

        match method {
            "existsMap" => self.handle_exists(id, args),
            "deleteMap" => self.handle_delete(id, args),
            "hasPermission" => self.handle_has_permission(id, args),
            "askPermission" => self.handle_ask_permission(id, args).await,
            "writeMapFile" => self.handle_write(id, args),
            "getLength" => self.handle_length(id, args),
            "readMapFile" => self.handle_read(id, args),
            _ => {
                warn!("Unknown method: {}", method);
                DispatchResult::NotImplemented(NotImplementedReply::new(id))
            }
        }
    }

    fn handle_exists(&self, id: Value, args: Value) -> DispatchResult {
        let uri = match require_uri(&id, &args) {
            Ok(uri) => uri,
            Err(reply) => return reply,
        };
        match self.store.exists(&uri) {
            Ok(exists) => success(id, json!(exists)),
            Err(e) => storage_error(id, &e),
        }
    }

    fn handle_delete(&self, id: Value, args: Value) -> DispatchResult {
        let uri = match require_uri(&id, &args) {
            Ok(uri) => uri,
            Err(reply) => return reply,
        };
        // Deleting a resource that never existed still succeeds.
        match self.store.delete(&uri) {
            Ok(()) => success(id, json!(true)),
            Err(e) => storage_error(id, &e),
        }
    }

    fn handle_has_permission(&self, id: Value, args: Value) -> DispatchResult {
        let params: UriParams = match decode(&id, args) {
            Ok(p) => p,
            Err(reply) => return reply,
        };
        // The identifier is required; sending none is a caller contract
        // violation. An empty string is allowed and simply matches nothing.
        let uri = match params.uri_string {
            Some(u) => ResourceId::new(u),
            None => return argument_error(id),
        };
        success(id, json!(self.registry.has(&uri)))
    }

    async fn handle_ask_permission(&self, id: Value, args: Value) -> DispatchResult {
        let params: AskPermissionParams = match decode(&id, args) {
            Ok(p) => p,
            Err(reply) => return reply,
        };
        let kind = AccessKind::from_arg(params.permission_type.as_deref());

        let (token, rx) = self.broker.register();
        debug!("Launching {} picker, token {}", kind.as_str(), token);
        self.picker.launch(PickerRequest {
            token,
            kind,
            suggested_name: params.filename,
        });

        // Suspend until the out-of-band picker decision arrives. There is no
        // timeout; a closed channel (picker dropped) counts as cancellation.
        match rx.await {
            Ok(GrantOutcome::Granted(uri)) => {
                // Persist the grant before completing the reply, so the
                // permission survives a restart that races the caller.
                if let Err(e) = self.registry.grant(&uri, kind) {
                    warn!("Failed to persist grant for {}: {}", uri, e);
                    return storage_error(id, &e);
                }
                success(id, json!(uri.as_str()))
            }
            Ok(GrantOutcome::Cancelled) | Err(_) => success(id, Value::Null),
        }
    }

    fn handle_write(&self, id: Value, args: Value) -> DispatchResult {
        let params: WriteParams = match decode(&id, args) {
            Ok(p) => p,
            Err(reply) => return reply,
        };
        let (uri, data) = match (params.uri_string, params.data) {
            (Some(u), Some(d)) => (ResourceId::new(u), d),
            _ => return argument_error(id),
        };
        let data = match base64::engine::general_purpose::STANDARD.decode(&data) {
            Ok(bytes) => bytes,
            Err(e) => {
                return error(id, errors::ARGUMENT, format!("data is not valid base64: {e}"))
            }
        };

        if !self.store.can_write(&uri) {
            // Checked before any write API is touched.
            return error(
                id,
                errors::INVALID_FILE,
                format!("No write permission for {uri}"),
            );
        }

        match self.store.write(&uri, &data) {
            Ok(()) => success(id, json!(true)),
            Err(e) => storage_error(id, &e),
        }
    }

    fn handle_length(&self, id: Value, args: Value) -> DispatchResult {
        let params: UriParams = match decode(&id, args) {
            Ok(p) => p,
            Err(reply) => return reply,
        };
        // An absent identifier defaults to the empty string, which then
        // fails the blank check like any other empty identifier.
        let uri = ResourceId::new(params.uri_string.unwrap_or_default());
        if uri.is_empty() {
            return argument_error(id);
        }
        match self.store.length(&uri) {
            Ok(len) => success(id, json!(len)),
            Err(e) => storage_error(id, &e),
        }
    }

    fn handle_read(&self, id: Value, args: Value) -> DispatchResult {
        let params: ReadParams = match decode(&id, args) {
            Ok(p) => p,
            Err(reply) => return reply,
        };
        let uri = ResourceId::new(params.uri_string.unwrap_or_default());
        if uri.is_empty() {
            return argument_error(id);
        }
        // Numeric arguments are defaulted, not validated; negatives clamp
        // to zero.
        let offset = params.offset.max(0) as u64;
        let length = params.length.max(0) as usize;

        match self.store.read_range(&uri, offset, length) {
            Ok(bytes) => success(
                id,
                json!(base64::engine::general_purpose::STANDARD.encode(&bytes)),
            ),
            Err(e) => storage_error(id, &e),
        }
    }
}

fn success(id: Value, result: Value) -> DispatchResult {
    DispatchResult::Success(SuccessReply::new(id, result))
}

fn error(id: Value, code: &str, message: impl Into<String>) -> DispatchResult {
    DispatchResult::Error(ErrorReply::new(id, code, message))
}

fn storage_error(id: Value, err: &StorageError) -> DispatchResult {
    error(id, err.kind(), err.to_string())
}

fn argument_error(id: Value) -> DispatchResult {
    error(id, errors::ARGUMENT, "Invalid argument")
}

fn decode<T: serde::de::DeserializeOwned>(id: &Value, args: Value) -> Result<T, DispatchResult> {
    serde_json::from_value(args).map_err(|e| {
        error(
            id.clone(),
            errors::ARGUMENT,
            format!("Invalid arguments: {e}"),
        )
    })
}

/// Decode and validate a non-empty `uriString`, the common case for the
/// identifier-checked operations.
fn require_uri(id: &Value, args: &Value) -> Result<ResourceId, DispatchResult> {
    let params: UriParams = decode(id, args.clone())?;
    let uri = ResourceId::new(params.uri_string.unwrap_or_default());
    if uri.is_empty() {
        return Err(argument_error(id.clone()));
    }
    Ok(uri)
}
