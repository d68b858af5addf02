pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod repos;
pub mod routes;
pub mod services;
pub mod types;
pub mod utils;
