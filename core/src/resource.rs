//! Opaque resource identifiers and access kinds.

use serde::{Deserialize, Serialize};

/// An opaque token naming a permission-scoped storage object.
///
/// Resource identifiers are not filesystem paths; the only structure the
/// bridge relies on is equality against previously granted tokens. How a
/// token resolves to actual bytes is entirely up to the
/// [`DocumentStore`](crate::store::DocumentStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The kind of access a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
}

impl AccessKind {
    /// Parse the `type` argument of `askPermission`.
    ///
    /// Absent defaults to write; any value other than `"read"` also means
    /// write. This matches the caller-visible contract exactly.
    pub fn from_arg(value: Option<&str>) -> Self {
        match value {
            Some("read") => Self::Read,
            _ => Self::Write,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_id_equality_is_exact() {
        let a = ResourceId::from("doc://map.bin");
        let b = ResourceId::new("doc://map.bin".to_string());
        let c = ResourceId::from("doc://Map.bin");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn blank_tokens_are_empty() {
        assert!(ResourceId::from("").is_empty());
        assert!(!ResourceId::from("doc://map.bin").is_empty());
    }

    #[test]
    fn resource_id_serializes_as_plain_string() {
        let id = ResourceId::from("doc://map.bin");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"doc://map.bin\""
        );
    }

    #[test]
    fn access_kind_defaults_to_write() {
        assert_eq!(AccessKind::from_arg(None), AccessKind::Write);
        assert_eq!(AccessKind::from_arg(Some("read")), AccessKind::Read);
        assert_eq!(AccessKind::from_arg(Some("write")), AccessKind::Write);
        // Unknown values fall back to write rather than failing.
        assert_eq!(AccessKind::from_arg(Some("banana")), AccessKind::Write);
    }
}
