pub mod filter;
pub mod handlers;
pub mod rich_text;
pub mod sanitize;
pub mod store;
