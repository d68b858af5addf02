pub mod app;
pub mod db;

pub use app::AppError;
pub use db::DatabaseError;
