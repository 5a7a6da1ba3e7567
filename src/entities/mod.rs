pub mod order;
pub mod referral;
pub mod withdrawal;
