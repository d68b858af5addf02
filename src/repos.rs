pub mod base;
pub mod points_platform;
