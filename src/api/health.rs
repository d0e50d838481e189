use chrono::Utc;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use sea_orm::DatabaseConnection;

use crate::types::dto::common::HealthResponse;

const SERVICE_NAME: &str = env!("CARGO_PKG_NAME");

/// Liveness and database reachability
pub struct HealthApi {
    db: DatabaseConnection,
}

impl HealthApi {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[derive(Tags)]
enum ApiTags {
    Health,
}

#[derive(ApiResponse, Debug)]
pub enum HealthCheckResponse {
    /// Service and database are up
    #[oai(status = 200)]
    Healthy(Json<HealthResponse>),

    /// Service is up but the database did not answer
    #[oai(status = 503)]
    Degraded(Json<HealthResponse>),
}

#[OpenApi]
impl HealthApi {
    /// Health check
    ///
    /// Pings the database; answers 503 when it is unreachable.
    #[oai(path = "/health", method = "get", tag = "ApiTags::Health")]
    async fn health(&self) -> HealthCheckResponse {
        let database_up = match self.db.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Health check database ping failed");
                false
            }
        };

        let body = HealthResponse {
            service: SERVICE_NAME.to_string(),
            status: if database_up { "healthy" } else { "degraded" }.to_string(),
            database: if database_up { "up" } else { "down" }.to_string(),
            timestamp: Utc::now().to_rfc3339(),
        };

        if database_up {
            HealthCheckResponse::Healthy(Json(body))
        } else {
            HealthCheckResponse::Degraded(Json(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::setup_test_db;

    #[tokio::test]
    async fn test_health_reports_reachable_database() {
        let api = HealthApi::new(setup_test_db().await);

        match api.health().await {
            HealthCheckResponse::Healthy(Json(body)) => {
                assert_eq!(body.service, "estagiogo-backend");
                assert_eq!(body.status, "healthy");
                assert_eq!(body.database, "up");
            }
            other => panic!("expected healthy, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_health_degrades_without_database() {
        let api = HealthApi::new(DatabaseConnection::Disconnected);

        match api.health().await {
            HealthCheckResponse::Degraded(Json(body)) => {
                assert_eq!(body.status, "degraded");
                assert_eq!(body.database, "down");
            }
            other => panic!("expected degraded, got {:?}", other),
        }
    }
}
