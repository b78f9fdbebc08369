//! Wire error codes for the mapstore method channel.
//!
//! Codes are stable strings; the caller matches on them to distinguish
//! argument faults from host-level failures.

/// A required identifier argument was missing or empty.
pub const ARGUMENT: &str = "ArgumentException";

/// The host failed to open the resource.
pub const FILE_NOT_FOUND: &str = "FileNotFoundException";

/// A host-level read/write failure.
pub const IO: &str = "IOException";

/// The resource does not exist or cannot be accessed.
pub const FILE_ACCESS: &str = "FileAccessException";

/// A write was attempted without write permission.
pub const INVALID_FILE: &str = "InvalidFileException";

/// The incoming line was not a valid method call.
pub const PARSE_ERROR: &str = "ParseError";
