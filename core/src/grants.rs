//! Deferred permission-grant correlation.
//!
//! Asking for a permission launches a user-facing picker and returns control
//! immediately; the user's decision arrives later as an out-of-band event.
//! Each request is keyed by a generated [`GrantToken`] mapped to a one-shot
//! reply channel, so concurrent grant requests of the same kind cannot
//! clobber each other's reply.
//!
//! Flow: `Idle → AwaitingUserChoice → {Granted → PersistGrant → Completed(id)}
//! | {Cancelled → Completed(null)}`. Cancellation is a success carrying no
//! value, never an error. There is no timeout; a picker the user never
//! resolves leaves its request pending, and a dropped picker completes the
//! request as cancelled.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use uuid::Uuid;

use crate::resource::{AccessKind, ResourceId};

/// Correlation token for one in-flight grant request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GrantToken(String);

impl GrantToken {
    fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl std::fmt::Display for GrantToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's decision for a grant request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The user chose a resource; carries the resolved identifier.
    Granted(ResourceId),
    /// The user dismissed the picker.
    Cancelled,
}

/// What the picker is asked to present.
#[derive(Debug, Clone)]
pub struct PickerRequest {
    pub token: GrantToken,
    pub kind: AccessKind,
    /// Suggested file name, used by write pickers that create the document.
    pub suggested_name: Option<String>,
}

/// A user-facing resource picker.
///
/// `launch` must not block: implementations hand the request to the host UI
/// (or a background task) and later deliver the outcome to the
/// [`GrantBroker`] under the request's token.
pub trait DocumentPicker: Send + Sync {
    fn launch(&self, request: PickerRequest);
}

/// Token-keyed map of pending grant requests.
///
/// Cloning is cheap; clones share the same pending map.
#[derive(Clone, Default)]
pub struct GrantBroker {
    pending: Arc<Mutex<HashMap<GrantToken, oneshot::Sender<GrantOutcome>>>>,
}

impl GrantBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new grant request, yielding its token and the receiver the
    /// dispatcher awaits.
    pub fn register(&self) -> (GrantToken, oneshot::Receiver<GrantOutcome>) {
        let token = GrantToken::generate();
        let (tx, rx) = oneshot::channel();
        self.pending.lock().unwrap().insert(token.clone(), tx);
        (token, rx)
    }

    /// Deliver the user's decision for `token`.
    ///
    /// Returns `false` if the token is unknown (already resolved, or never
    /// registered). Each token resolves at most once.
    pub fn resolve(&self, token: &GrantToken, outcome: GrantOutcome) -> bool {
        let sender = self.pending.lock().unwrap().remove(token);
        match sender {
            // A send error means the requester went away; the decision is
            // simply dropped.
            Some(tx) => tx.send(outcome).is_ok(),
            None => false,
        }
    }

    /// Number of grant requests still awaiting a user decision.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}
