pub mod reload;
pub mod studio_api;
