// Public API
pub mod session;
pub mod session_store;
pub mod sled_storage;
pub mod storage;
pub mod tokens;

// Re-export commonly used types
pub use session::{SessionContext, SessionSnapshot};
pub use session_store::{SessionStatus, SessionStore};
pub use sled_storage::SledStore;
pub use storage::{KeyValueStore, MemoryStore};
pub use tokens::TokenPair;
