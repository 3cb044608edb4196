pub mod branch_service;
pub mod layout_service;
pub mod reload_signal;
pub mod service_error;
