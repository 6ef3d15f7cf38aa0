mod auth;
mod projects;

pub use auth::*;
pub use projects::*;
