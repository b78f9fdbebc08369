pub mod errors;
pub mod grants;
pub mod permissions;
pub mod picker;
pub mod protocol;
pub mod resource;
pub mod store;
