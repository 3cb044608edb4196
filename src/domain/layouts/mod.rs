pub mod form_item;
pub mod layout;
pub mod layout_settings;
