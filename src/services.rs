pub mod platform_cache;
pub mod points_valuation;
pub mod profit;
