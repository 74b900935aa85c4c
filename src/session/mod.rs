//! Session state module
//!
//! Tracks whether the local client believes a user is logged in. The flag is
//! only a hint for front ends (e.g. to skip the login prompt); the server is
//! the authority on whether a credential is valid.
//!
//! # Overview
//!
//! - `SessionState` - Read/write accessors for the logged-in flag
//! - `KeyValueStore` - Backing store the flag is persisted in
//! - `MemoryStore` / `FileStore` - In-process and JSON-file stores

mod state;
mod store;

pub use state::{SessionState, LOGGED_IN_VALUE, SESSION_KEY};
pub use store::{FileStore, KeyValueStore, MemoryStore};
