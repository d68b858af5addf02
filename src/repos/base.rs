use crate::error::DatabaseError;

pub trait BaseRepo {
    fn get_table_name() -> &'static str;

    fn get_columns() -> &'static str;

    fn create_not_found_error(resource: impl Into<String>) -> DatabaseError {
        DatabaseError::NotFound(format!("{} in {}", resource.into(), Self::get_table_name()))
    }
}
