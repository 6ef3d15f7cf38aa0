pub mod auth;
pub mod mindmaps;
pub mod projects;
pub mod voting;
