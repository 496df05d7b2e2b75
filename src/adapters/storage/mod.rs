//! Storage Adapters
//!
//! Implementations of the `AllowlistStore` and `SecretLog` ports.
//!
//! ## Available Adapters
//!
//! - **JsonAllowlistStore** - Pretty-printed JSON array on disk
//! - **FileSecretLog** - Newline-delimited text file
//! - **InMemoryAllowlistStore** / **InMemorySecretLog** - In memory (testing)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSecretLog, JsonAllowlistStore};
//!
//! let allowlist = JsonAllowlistStore::new("./data/Whitelist.json");
//! let log = FileSecretLog::new("./logs/verification.log");
//! ```

mod atomic;
mod file_secret_log;
mod in_memory;
mod json_allowlist_store;

pub use file_secret_log::FileSecretLog;
pub use in_memory::{InMemoryAllowlistStore, InMemorySecretLog};
pub use json_allowlist_store::JsonAllowlistStore;
