// Read-side projection over the three stores
pub mod settlement;

// Write-side services
pub mod orders;
pub mod referrals;
pub mod withdrawals;
