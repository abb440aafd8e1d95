//! Agent settings (JSON) and the persisted power strip record (INI).

pub mod persistence;
pub mod store;
pub mod types;
