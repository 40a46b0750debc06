pub mod handlers;
pub mod paginate;
pub mod pdf;
pub mod save;
pub mod sink;
