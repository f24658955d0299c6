// Books module
// Paged listing, lookup, create/update and delete of book records

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::{Book, BookRequest};
pub use repository::{BookRepository, BookStore};
pub use service::BookService;
