pub mod auth_service;
pub mod email_availability;
pub mod password;
pub mod referral_code;
pub mod referral_service;
pub mod token_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthServiceError, LoginRequest};
pub use email_availability::{EmailAvailability, EmailConflict};
pub use referral_code::{ReferralCodeError, ReferralCodeGenerator};
pub use referral_service::{AddRefereeRequest, ReferralService, ReferralServiceError};
pub use token_service::{Claims, TokenError, TokenService};
pub use user_service::{SignupRequest, UserService, UserServiceError};
