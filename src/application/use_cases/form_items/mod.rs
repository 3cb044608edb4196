pub mod form_item_editor;
pub mod save_form_item;
