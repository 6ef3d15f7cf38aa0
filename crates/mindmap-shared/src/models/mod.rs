mod document;
mod node;
mod user;
mod voting;

pub use document::*;
pub use node::*;
pub use user::*;
pub use voting::*;
