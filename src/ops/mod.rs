pub mod editor;
pub mod filter;
pub mod list;
pub mod store;
