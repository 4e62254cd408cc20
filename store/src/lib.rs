pub mod auth;
pub mod list;
pub mod models;
pub mod remote;
pub mod sync;

mod memory;
pub use memory::MemoryStore;

pub use auth::{AuthBackend, AuthError, AuthSession, AuthSnapshot, MemoryAuth, SessionState};
pub use list::{Identified, ListStore, Snapshot};
pub use models::{Note, NotePatch, Priority, Task, TaskPatch, TaskStatus, UserInfo};
pub use remote::{Record, RemoteError, RemoteStore};
pub use sync::{current_timestamp, NoteGateway, TaskGateway};
