pub mod api;
pub mod local;
pub mod session;

pub use api::{ApiClient, ApiError};
pub use local::{LocalState, SavedLogin};
pub use session::MindmapSession;
