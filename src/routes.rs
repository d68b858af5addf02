pub mod health;
pub mod profits;
pub mod valuations;
pub mod version;
