mod client;

pub use client::{ApiClient, ApiError};
