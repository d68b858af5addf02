use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::repos::base::BaseRepo;
use crate::services::points_valuation::PointsPlatformResolver;

/// A loyalty program and the yen value of one of its points.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct PointsPlatform {
    pub uid: Uuid,
    pub name: String,
    pub yen_conversion_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PointsPlatform {
    pub fn new(name: impl Into<String>, yen_conversion_rate: f64) -> Self {
        let time = Utc::now();
        PointsPlatform {
            uid: Uuid::now_v7(),
            name: name.into(),
            yen_conversion_rate,
            created_at: time,
            updated_at: time,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePointsPlatformDbPayload {
    pub name: String,
    pub yen_conversion_rate: f64,
}

pub struct PointsPlatformRepo;

impl BaseRepo for PointsPlatformRepo {
    fn get_table_name() -> &'static str {
        "points_platforms"
    }

    fn get_columns() -> &'static str {
        "uid, name, yen_conversion_rate, created_at, updated_at"
    }
}

impl PointsPlatformRepo {
    pub async fn get(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        uid: Uuid,
    ) -> Result<PointsPlatform, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} WHERE uid = $1",
            Self::get_columns(),
            Self::get_table_name()
        );
        let row = sqlx::query_as::<_, PointsPlatform>(&query)
            .bind(uid)
            .fetch_one(tx.as_mut())
            .await
            .map_err(|e| DatabaseError::from_sqlx_error(e, "getting points platform"))?;
        Ok(row)
    }

    pub async fn get_by_name(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        name: &str,
    ) -> Result<Option<PointsPlatform>, DatabaseError> {
        let query = format!(
            "SELECT {} FROM {} WHERE name = $1",
            Self::get_columns(),
            Self::get_table_name()
        );
        let row = sqlx::query_as::<_, PointsPlatform>(&query)
            .bind(name)
            .fetch_optional(tx.as_mut())
            .await
            .map_err(|e| DatabaseError::from_sqlx_error(e, "getting points platform by name"))?;
        Ok(row)
    }

    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        payload: CreatePointsPlatformDbPayload,
    ) -> Result<PointsPlatform, DatabaseError> {
        let uid = Uuid::now_v7();
        let query = format!(
            "INSERT INTO {} (uid, name, yen_conversion_rate) VALUES ($1, $2, $3) RETURNING {}",
            Self::get_table_name(),
            Self::get_columns()
        );
        let row = sqlx::query_as::<_, PointsPlatform>(&query)
            .bind(uid)
            .bind(payload.name)
            .bind(payload.yen_conversion_rate)
            .fetch_one(tx.as_mut())
            .await
            .map_err(|e| DatabaseError::from_sqlx_error(e, "creating points platform"))?;
        Ok(row)
    }
}

/// Resolves platform ids (textual uuids) against Postgres.
#[derive(Clone)]
pub struct PgPointsPlatformResolver {
    db_pool: sqlx::PgPool,
}

impl PgPointsPlatformResolver {
    pub fn new(db_pool: sqlx::PgPool) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PointsPlatformResolver for PgPointsPlatformResolver {
    async fn resolve_points_platform(&self, id: &str) -> Result<PointsPlatform, DatabaseError> {
        let uid = Uuid::parse_str(id).map_err(|_| {
            PointsPlatformRepo::create_not_found_error(format!("points platform {}", id))
        })?;
        let mut tx = self.db_pool.begin().await?;
        let platform = PointsPlatformRepo::get(&mut tx, uid).await?;
        tx.commit().await?;
        Ok(platform)
    }
}

/// Resolver over a fixed set of platforms keyed by arbitrary id strings.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlatformResolver {
    platforms: HashMap<String, PointsPlatform>,
}

impl InMemoryPlatformResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platform(mut self, id: impl Into<String>, platform: PointsPlatform) -> Self {
        self.insert(id, platform);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, platform: PointsPlatform) {
        self.platforms.insert(id.into(), platform);
    }
}

#[async_trait]
impl PointsPlatformResolver for InMemoryPlatformResolver {
    async fn resolve_points_platform(&self, id: &str) -> Result<PointsPlatform, DatabaseError> {
        self.platforms.get(id).cloned().ok_or_else(|| {
            PointsPlatformRepo::create_not_found_error(format!("points platform {}", id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_resolver() {
        let resolver = InMemoryPlatformResolver::new()
            .with_platform("rakuten", PointsPlatform::new("Rakuten Points", 1.0));

        let found = resolver.resolve_points_platform("rakuten").await.unwrap();
        assert_eq!(found.name, "Rakuten Points");
        assert_eq!(found.yen_conversion_rate, 1.0);

        let missing = resolver.resolve_points_platform("unknown").await;
        assert!(matches!(missing, Err(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_not_found_error_names_table() {
        let err = PointsPlatformRepo::create_not_found_error("points platform x");
        assert_eq!(err.to_string(), "Not found: points platform x in points_platforms");
    }
}
