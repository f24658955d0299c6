// Authentication module
// Credential verification, JWT issuance and validation, token refresh and route policy

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use handlers::{me_handler, refresh_handler, signin_handler};
pub use middleware::require_auth;
pub use repository::UserRepository;
pub use service::AuthService;
pub use token::TokenService;
