pub mod api;
pub mod collab;
pub mod error;
pub mod permissions;
pub mod state;
pub mod tree;

mod models;

pub use error::MapError;
pub use models::*;
