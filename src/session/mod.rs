// Gateway module for session management - follows the Train Station Pattern
// All external access must go through this gateway

// Private submodules - not directly accessible from outside
mod controller;
mod message;
mod repository;
mod store;

// Public re-exports - the ONLY way to access session functionality
pub use controller::{ConversationController, PendingQuery};
pub use message::{Message, Role, Session};
pub use repository::{FileSnapshotRepository, MemorySnapshotRepository, SnapshotRepository};
pub use store::SessionStore;
