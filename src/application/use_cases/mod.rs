pub mod branches;
pub mod form_items;
