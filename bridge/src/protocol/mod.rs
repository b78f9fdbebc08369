pub mod messages;
pub mod methods;

pub use mapstore_core::protocol::errors;
