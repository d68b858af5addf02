use std::sync::Arc;

use crate::services::profit::ProfitCalculator;

#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub calculator: Arc<ProfitCalculator>,
}

impl AppState {
    pub fn new(calculator: ProfitCalculator) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            calculator: Arc::new(calculator),
        }
    }
}
