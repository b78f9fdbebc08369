//! Headless document picker over a local store root.
//!
//! Stands in for the host's user-facing picker when the bridge runs against
//! a plain directory: a write request creates the suggested document and
//! grants it, a read request selects the first regular file in the root.
//! Outcomes are delivered to the [`GrantBroker`] exactly like a real picker
//! completion event would be.

use std::path::PathBuf;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::grants::{DocumentPicker, GrantBroker, GrantOutcome, PickerRequest};
use crate::resource::AccessKind;
use crate::store::local::LocalStore;

pub struct LocalPicker {
    root: PathBuf,
    broker: GrantBroker,
}

impl LocalPicker {
    pub fn new(root: impl Into<PathBuf>, broker: GrantBroker) -> Self {
        Self {
            root: root.into(),
            broker,
        }
    }

    fn pick(&self, request: &PickerRequest) -> GrantOutcome {
        match request.kind {
            AccessKind::Write => self.create_document(request.suggested_name.as_deref()),
            AccessKind::Read => self.select_existing(),
        }
    }

    fn create_document(&self, suggested: Option<&str>) -> GrantOutcome {
        let name = match suggested {
            Some(n) if !n.is_empty() && !n.contains(['/', '\\']) => n.to_string(),
            _ => format!("document-{}.bin", &Uuid::new_v4().to_string()[..8]),
        };

        if let Err(e) = std::fs::create_dir_all(&self.root) {
            warn!("Picker could not create root {}: {}", self.root.display(), e);
            return GrantOutcome::Cancelled;
        }
        let path = self.root.join(&name);
        // CREATE-style pickers hand back an existing (possibly empty) document.
        if !path.is_file() {
            if let Err(e) = std::fs::File::create(&path) {
                warn!("Picker could not create {}: {}", path.display(), e);
                return GrantOutcome::Cancelled;
            }
        }
        GrantOutcome::Granted(LocalStore::token_for(&name))
    }

    fn select_existing(&self) -> GrantOutcome {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(_) => return GrantOutcome::Cancelled,
        };

        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .collect();
        names.sort();

        match names.first() {
            Some(name) => GrantOutcome::Granted(LocalStore::token_for(name)),
            None => GrantOutcome::Cancelled,
        }
    }
}

impl DocumentPicker for LocalPicker {
    fn launch(&self, request: PickerRequest) {
        let outcome = self.pick(&request);
        debug!("Picker resolved {} as {:?}", request.token, outcome);
        let broker = self.broker.clone();
        // Complete through the broker on a separate task, like a host
        // picker's out-of-band completion event.
        tokio::spawn(async move {
            broker.resolve(&request.token, outcome);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grants::GrantBroker;
    use crate::resource::{AccessKind, ResourceId};

    fn launch(picker: &LocalPicker, broker: &GrantBroker, kind: AccessKind, name: Option<&str>) -> tokio::sync::oneshot::Receiver<GrantOutcome> {
        let (token, rx) = broker.register();
        picker.launch(PickerRequest {
            token,
            kind,
            suggested_name: name.map(String::from),
        });
        rx
    }

    #[tokio::test]
    async fn write_pick_creates_and_grants_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let broker = GrantBroker::new();
        let picker = LocalPicker::new(dir.path(), broker.clone());

        let rx = launch(&picker, &broker, AccessKind::Write, Some("map.bin"));
        let outcome = rx.await.unwrap();

        assert_eq!(
            outcome,
            GrantOutcome::Granted(ResourceId::from("doc://map.bin"))
        );
        assert!(dir.path().join("map.bin").is_file());
    }

    #[tokio::test]
    async fn write_pick_without_name_generates_one() {
        let dir = tempfile::tempdir().unwrap();
        let broker = GrantBroker::new();
        let picker = LocalPicker::new(dir.path(), broker.clone());

        let rx = launch(&picker, &broker, AccessKind::Write, None);
        match rx.await.unwrap() {
            GrantOutcome::Granted(id) => {
                assert!(id.as_str().starts_with("doc://document-"))
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_pick_over_empty_root_cancels() {
        let dir = tempfile::tempdir().unwrap();
        let broker = GrantBroker::new();
        let picker = LocalPicker::new(dir.path(), broker.clone());

        let rx = launch(&picker, &broker, AccessKind::Read, None);
        assert_eq!(rx.await.unwrap(), GrantOutcome::Cancelled);
    }

    #[tokio::test]
    async fn read_pick_selects_first_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.map"), b"x").unwrap();
        std::fs::write(dir.path().join("a.map"), b"x").unwrap();

        let broker = GrantBroker::new();
        let picker = LocalPicker::new(dir.path(), broker.clone());
        let rx = launch(&picker, &broker, AccessKind::Read, None);

        assert_eq!(
            rx.await.unwrap(),
            GrantOutcome::Granted(ResourceId::from("doc://a.map"))
        );
    }
}
