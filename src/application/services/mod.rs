pub mod layout_cache;
