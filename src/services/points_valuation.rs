use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DatabaseError;
use crate::repos::points_platform::PointsPlatform;
use crate::utils::numeric_input::deserialize_numeric;

/// Data-access capability that turns a platform id into its record.
/// `DatabaseError::NotFound` signals an unknown id; anything else is a failed lookup.
#[async_trait]
pub trait PointsPlatformResolver: Send + Sync {
    async fn resolve_points_platform(&self, id: &str) -> Result<PointsPlatform, DatabaseError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PointsValuationRequest {
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub platform_points: f64,
    #[serde(default)]
    pub platform_points_platform_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_numeric")]
    pub card_points: f64,
    #[serde(default)]
    pub card_points_platform_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PointsValuationResult {
    pub platform_points_value: f64,
    pub card_points_value: f64,
    pub total_value: f64,
}

impl PointsValuationResult {
    pub fn new(platform_points_value: f64, card_points_value: f64) -> Self {
        Self {
            platform_points_value,
            card_points_value,
            total_value: platform_points_value + card_points_value,
        }
    }
}

#[derive(Clone)]
pub struct PointsValuationService {
    resolver: Arc<dyn PointsPlatformResolver>,
}

impl PointsValuationService {
    pub fn new(resolver: Arc<dyn PointsPlatformResolver>) -> Self {
        Self { resolver }
    }

    /// Yen value of `points` on the given platform. A missing id, zero
    /// points, an unknown platform or a failed lookup all count as 0.
    pub async fn value_of(&self, points: f64, platform_id: Option<&str>) -> f64 {
        let platform_id = match platform_id {
            Some(id) if !id.is_empty() => id,
            _ => return 0.0,
        };
        if points == 0.0 {
            return 0.0;
        }

        match self.resolver.resolve_points_platform(platform_id).await {
            Ok(platform) => points * platform.yen_conversion_rate,
            Err(e) if e.is_not_found() => {
                tracing::debug!("points platform {} not found, valuing {} points at 0", platform_id, points);
                0.0
            }
            Err(e) => {
                tracing::warn!("points platform lookup failed for {}: {}", platform_id, e);
                0.0
            }
        }
    }

    /// Values both point balances concurrently on the current task.
    pub async fn value_of_both(
        &self,
        platform_points: f64,
        platform_points_platform_id: Option<&str>,
        card_points: f64,
        card_points_platform_id: Option<&str>,
    ) -> PointsValuationResult {
        let (platform_points_value, card_points_value) = tokio::join!(
            self.value_of(platform_points, platform_points_platform_id),
            self.value_of(card_points, card_points_platform_id),
        );
        PointsValuationResult::new(platform_points_value, card_points_value)
    }

    pub async fn value_request(&self, request: &PointsValuationRequest) -> PointsValuationResult {
        self.value_of_both(
            request.platform_points,
            request.platform_points_platform_id.as_deref(),
            request.card_points,
            request.card_points_platform_id.as_deref(),
        )
        .await
    }
}
