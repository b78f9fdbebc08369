//! Typed argument structs for each bridge method.
//!
//! Validation is deliberately per-operation and asymmetric: identifier
//! arguments are checked for presence by the handlers, while numeric
//! arguments silently default to zero. This mirrors the caller-visible
//! contract and must not be unified.

use serde::Deserialize;

// ── existsMap / deleteMap / hasPermission / getLength ───────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UriParams {
    pub uri_string: Option<String>,
}

// ── askPermission ───────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct AskPermissionParams {
    /// `"read"` or `"write"`; absent and unknown values mean write.
    #[serde(rename = "type")]
    pub permission_type: Option<String>,
    /// Suggested document name, honored by write pickers only.
    pub filename: Option<String>,
}

// ── writeMapFile ────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteParams {
    pub uri_string: Option<String>,
    /// Base64-encoded payload.
    pub data: Option<String>,
}

// ── readMapFile ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadParams {
    pub uri_string: Option<String>,
    #[serde(default)]
    pub offset: i64,
    #[serde(default)]
    pub length: i64,
}
