//! Steam Web API client and response models.

mod client;
pub mod models;

pub use client::SteamClient;
pub use models::SteamApp;
