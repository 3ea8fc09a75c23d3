pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::PropertyStatus;
pub use error::CoreError;
pub use structs::{validate_id, Property, PropertyDraft};
