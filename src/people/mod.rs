// People module
// Paged listing, lookup, create/update, soft-disable and delete of person records

pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use handlers::*;
pub use models::{Person, PersonRequest};
pub use repository::{PersonRepository, PersonStore};
pub use service::PersonService;
