// tasktrack - Local task list manager with write-through persistence

pub mod filter;
pub mod models;
pub mod persist;
pub mod store;

// Re-export main types for convenience
pub use filter::{FilterMode, Query};
pub use models::{Priority, Task, now_ms, seed_tasks};
pub use persist::{FileSlot, MemorySlot, StateSlot};
pub use store::{Stats, TaskStore};
