pub mod health_handlers;
pub mod json;
pub mod referral_handlers;
pub mod user_handlers;

pub use health_handlers::health_handler;
pub use json::JsonBody;
pub use referral_handlers::{add_referee_handler, referrals_data_handler};
pub use user_handlers::user_details_handler;
