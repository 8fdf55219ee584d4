pub mod referral;
pub mod user;

pub use referral::{RefereeStatus, Referral};
pub use user::{NewUser, User, UserDetails};
