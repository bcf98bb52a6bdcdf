pub mod client;
pub mod models;

pub use client::TryHackMeClient;
pub use models::ApiError;
