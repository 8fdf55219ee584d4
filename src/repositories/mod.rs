pub mod referral_repository;
pub mod user_repository;

pub use referral_repository::{ReferralRepository, SqliteReferralRepository};
pub use user_repository::{
    RepositoryError, RepositoryResult, SqliteUserRepository, UniqueField, UserRepository,
};
