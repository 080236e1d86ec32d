//! Session cache
//!
//! The only durable state the client produces: a small key-value store that survives
//! restarts and holds the identifiers of the authenticated session.
//!
//! # Modules
//!
//! - [`store`] - `SessionStore` trait with in-memory and file-backed implementations
//! - [`record`] - The four-key session layout written after a successful login

pub mod record;
pub mod store;

// Re-export commonly used items for convenience
pub use record::{
    SessionRecord, AUTH_TOKEN_KEY, SESSION_KEYS, USER_ID_KEY, USER_NAME_KEY, USER_ROLE_KEY,
};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
