pub mod handlers;
pub mod middleware;

pub use handlers::{login_handler, signup_handler};
pub use middleware::{require_bearer_token, AuthenticatedUser};
