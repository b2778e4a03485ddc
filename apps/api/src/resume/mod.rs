pub mod document;
pub mod handlers;
