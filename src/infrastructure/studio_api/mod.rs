pub mod client;
pub mod paths;

pub use client::StudioApiClient;
